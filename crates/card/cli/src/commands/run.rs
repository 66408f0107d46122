//! Scripted walk through every instruction

use cardlab_engine::commands::{self, crypto_test, rsa1024};
use cardlab_engine::{Cipher, Simulator};

use super::Session;
use crate::config::BenchConfig;
use crate::display::{section_title, success, warning};

pub fn run_command(config: &BenchConfig) -> eyre::Result<()> {
    let mut card = Session::new(Simulator::new(config.simulator_config())?);
    let mut peer = Session::new(Simulator::new(config.simulator_config())?);

    run_crypto_test(&mut card, &mut peer)?;
    run_rsa1024(&mut card)?;

    if card.failures == 0 {
        println!("\n{}", success("All instructions answered 9000"));
    } else {
        println!(
            "\n{}",
            warning(&format!("{} instruction(s) returned an error status", card.failures))
        );
    }
    Ok(())
}

fn run_crypto_test(card: &mut Session, peer: &mut Session) -> eyre::Result<()> {
    println!("{}", section_title("CryptoTest"));
    card.expect("select", &commands::select_crypto_test())?;
    peer.card.select(cardlab_engine::CRYPTO_TEST_AID)?;

    card.step("echo-send", &crypto_test::echo_send(vec![0xCA, 0xFE]))?;
    card.step("echo-receive (Le=16)", &crypto_test::echo_receive(16))?;
    card.step("echo", &crypto_test::echo(vec![0xCA, 0xFE]))?;

    card.step("EC generate key pair", &crypto_test::generate_key_pair())?;
    let own = card.expect("EC export public", &crypto_test::export_public())?;

    peer.quiet(&crypto_test::generate_key_pair())?;
    let peer_public = peer.quiet(&crypto_test::export_public())?;
    peer.quiet(&crypto_test::import_external_public(own))?;

    card.step(
        "EC import external public",
        &crypto_test::import_external_public(peer_public.clone()),
    )?;
    card.step("EC derive shared secret", &crypto_test::derive_shared_secret())?;
    card.step("EC round trip", &crypto_test::round_trip(peer_public))?;

    let block: Vec<u8> = (0u8..32).collect();
    for (cipher, label) in [
        (Cipher::Aes128, "AES-128"),
        (Cipher::Aes192, "AES-192"),
        (Cipher::Aes256, "AES-256"),
    ] {
        let Some(encrypt) = crypto_test::encrypt(cipher, block.clone()) else {
            continue;
        };
        let ciphertext = card.expect(&format!("{label} encrypt"), &encrypt)?;
        if let Some(decrypt) = crypto_test::decrypt(cipher, ciphertext) {
            card.step(&format!("{label} decrypt"), &decrypt)?;
        }
    }

    card.step("SHA-256 (\"abc\")", &crypto_test::sha256(&b"abc"[..]))?;
    Ok(())
}

fn run_rsa1024(card: &mut Session) -> eyre::Result<()> {
    println!("{}", section_title("Rsa1024"));
    card.expect("select", &commands::select_rsa1024())?;

    card.step("generate key pair", &rsa1024::generate_key_pair())?;
    let modulus = card.expect("export modulus", &rsa1024::export_modulus())?;
    let exponent = card.expect("export exponent", &rsa1024::export_exponent())?;

    // Loop the card's own key back so it can verify what it signs
    card.step("set external modulus", &rsa1024::set_external_modulus(modulus))?;
    card.step("set external exponent", &rsa1024::set_external_exponent(exponent))?;

    let message = b"cardlab".to_vec();
    let ciphertext = card.expect("encrypt", &rsa1024::encrypt(message.clone()))?;
    card.step("decrypt", &rsa1024::decrypt(ciphertext))?;

    let signature = card.expect("sign", &rsa1024::sign(message.clone()))?;
    card.step("verify", &rsa1024::verify(&signature, &message))?;

    let block: Vec<u8> = (0u8..16).collect();
    let ciphertext = card.expect("3DES encrypt", &rsa1024::des3_encrypt(block))?;
    card.step("3DES decrypt", &rsa1024::des3_decrypt(ciphertext))?;
    Ok(())
}
