//! Timing harness
//!
//! Repeats one command against the simulator and reports the elapsed time.
//! Setup (key generation, key exchange) happens before the clock starts.

use std::time::{Duration, Instant};

use cardlab_apdu_core::{Bytes, CardTransport, Command, Response, ResultExt};
use cardlab_engine::commands::{self, crypto_test, rsa1024};
use cardlab_engine::{Cipher, Simulator};
use rand_v8::RngCore;
use tracing::{debug, info};

use crate::config::{BenchConfig, BenchOp};
use crate::display::{duration, key_value_box, success};

pub fn bench_command(config: &BenchConfig, op: BenchOp) -> eyre::Result<()> {
    if config.iterations == 0 {
        eyre::bail!("iterations must be at least 1");
    }

    let mut card = Simulator::new(config.simulator_config())?;
    let command = prepare(&mut card, op, config.size)?;
    debug!(?op, frame_len = command.command_length(), "Prepared bench command");

    // One untimed run catches setup mistakes before timing starts
    let response = card.transmit(&command)?;
    if !response.is_success() {
        eyre::bail!("{op:?} failed with status {}", response.status());
    }

    info!(?op, iterations = config.iterations, "Running bench");
    let start = Instant::now();
    for _ in 0..config.iterations {
        card.transmit(&command)?.into_payload()?;
    }
    let total = start.elapsed();
    let mean = total / config.iterations;

    println!(
        "{}",
        key_value_box(
            &format!("{op:?}"),
            vec![
                ("iterations", config.iterations.to_string()),
                ("payload", format!("{} bytes", command.payload().len())),
                ("total", duration(total)),
                ("mean", duration(mean)),
                ("throughput", throughput(command.payload().len(), mean)),
            ],
        )
    );
    println!("{}", success("Bench complete"));
    Ok(())
}

/// Select the right service, set up keys and build the timed command
fn prepare(card: &mut Simulator, op: BenchOp, size: usize) -> eyre::Result<Command> {
    let command = match op {
        BenchOp::Echo => {
            select(card, &commands::select_crypto_test())?;
            crypto_test::echo(random_payload(size, 1)?)
        }
        BenchOp::Aes128 | BenchOp::Aes192 | BenchOp::Aes256 => {
            select(card, &commands::select_crypto_test())?;
            let cipher = match op {
                BenchOp::Aes128 => Cipher::Aes128,
                BenchOp::Aes192 => Cipher::Aes192,
                _ => Cipher::Aes256,
            };
            crypto_test::encrypt(cipher, random_payload(size, cipher.block_size())?)
                .ok_or_else(|| eyre::eyre!("{cipher:?} is not offered by this service"))?
        }
        BenchOp::Sha256 => {
            select(card, &commands::select_crypto_test())?;
            crypto_test::sha256(random_payload(size, 1)?)
        }
        BenchOp::EcGenerate => {
            select(card, &commands::select_crypto_test())?;
            crypto_test::generate_key_pair()
        }
        BenchOp::Ecdh => {
            select(card, &commands::select_crypto_test())?;
            setup(card, "EC generate key pair", &crypto_test::generate_key_pair())?;
            let public = setup(card, "EC export public", &crypto_test::export_public())?;
            setup(
                card,
                "EC import external public",
                &crypto_test::import_external_public(public),
            )?;
            crypto_test::derive_shared_secret()
        }
        BenchOp::RsaEncrypt | BenchOp::RsaDecrypt | BenchOp::RsaSign | BenchOp::RsaVerify => {
            select(card, &commands::select_rsa1024())?;
            loop_back_rsa_key(card)?;
            let message = random_payload(size.min(117), 1)?;
            match op {
                BenchOp::RsaEncrypt => rsa1024::encrypt(message),
                BenchOp::RsaDecrypt => {
                    let ciphertext = setup(card, "RSA encrypt", &rsa1024::encrypt(message))?;
                    rsa1024::decrypt(ciphertext)
                }
                BenchOp::RsaSign => rsa1024::sign(message),
                _ => {
                    let signature = setup(card, "RSA sign", &rsa1024::sign(message.clone()))?;
                    rsa1024::verify(&signature, &message)
                }
            }
        }
        BenchOp::Des3 => {
            select(card, &commands::select_rsa1024())?;
            rsa1024::des3_encrypt(random_payload(size, Cipher::TripleDes.block_size())?)
        }
    };
    Ok(command)
}

fn select(card: &mut Simulator, command: &Command) -> eyre::Result<()> {
    setup(card, "select", command)?;
    Ok(())
}

/// Transmit an untimed command that must succeed
fn setup(card: &mut Simulator, label: &str, command: &Command) -> eyre::Result<Bytes> {
    Ok(card
        .transmit(command)
        .and_then(Response::into_payload)
        .context(label)?)
}

/// Make the card's own public key its external key
fn loop_back_rsa_key(card: &mut Simulator) -> eyre::Result<()> {
    let modulus = setup(card, "RSA export modulus", &rsa1024::export_modulus())?;
    let exponent = setup(card, "RSA export exponent", &rsa1024::export_exponent())?;
    setup(card, "RSA set external modulus", &rsa1024::set_external_modulus(modulus))?;
    setup(card, "RSA set external exponent", &rsa1024::set_external_exponent(exponent))?;
    Ok(())
}

/// Random bytes, `size` rounded down to whole blocks
fn random_payload(size: usize, block: usize) -> eyre::Result<Vec<u8>> {
    let size = size.min(255) / block * block;
    if size == 0 {
        eyre::bail!("payload size must cover at least one {block}-byte block");
    }
    let mut payload = vec![0u8; size];
    rand_v8::thread_rng().fill_bytes(&mut payload);
    Ok(payload)
}

fn throughput(bytes: usize, mean: Duration) -> String {
    let secs = mean.as_secs_f64();
    if bytes == 0 || secs == 0.0 {
        return "-".to_string();
    }
    format!("{:.1} KiB/s", bytes as f64 / secs / 1024.0)
}
