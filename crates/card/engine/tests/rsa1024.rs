use cardlab_apdu_core::{CardTransport, Command, Response};
use cardlab_engine::commands::{self, rsa1024};
use cardlab_engine::{RSA_MODULUS_LEN, Simulator, SimulatorConfig};

fn selected_card() -> Simulator {
    let mut card = Simulator::new(SimulatorConfig::new().with_log_frames(false)).unwrap();
    assert!(card.transmit(&commands::select_rsa1024()).unwrap().is_success());
    card
}

fn send(card: &mut Simulator, command: &Command) -> Response {
    card.transmit(command).unwrap()
}

fn ok(card: &mut Simulator, command: &Command) -> Vec<u8> {
    let response = send(card, command);
    assert!(response.is_success(), "{}", response.status());
    response.payload().to_vec()
}

/// Give `to` the public key of `from`
fn exchange(from: &mut Simulator, to: &mut Simulator) {
    let modulus = ok(from, &rsa1024::export_modulus());
    let exponent = ok(from, &rsa1024::export_exponent());
    ok(to, &rsa1024::set_external_modulus(modulus));
    ok(to, &rsa1024::set_external_exponent(exponent));
}

#[test]
fn encrypt_to_peer_and_decrypt() {
    let mut alice = selected_card();
    let mut bob = selected_card();
    exchange(&mut bob, &mut alice);

    let ciphertext = ok(&mut alice, &rsa1024::encrypt(&b"sixteen byte msg"[..]));
    assert_eq!(ciphertext.len(), RSA_MODULUS_LEN);

    assert_eq!(ok(&mut bob, &rsa1024::decrypt(ciphertext.clone())), b"sixteen byte msg");

    // Only the holder of the private key can decrypt
    let response = send(&mut alice, &rsa1024::decrypt(ciphertext));
    assert_eq!(response.status().to_u16(), 0x6F00);
}

#[test]
fn plaintext_over_the_padding_limit() {
    let mut card = selected_card();
    let mut peer = selected_card();
    exchange(&mut peer, &mut card);

    assert!(send(&mut card, &rsa1024::encrypt(vec![0x11; 117])).is_success());
    let response = send(&mut card, &rsa1024::encrypt(vec![0x11; 118]));
    assert_eq!(response.status().to_u16(), 0x6700);
}

#[test]
fn decrypt_needs_a_full_block() {
    let mut card = selected_card();
    let response = send(&mut card, &rsa1024::decrypt(vec![0x00; 64]));
    assert_eq!(response.status().to_u16(), 0x6700);
}

#[test]
fn sign_and_verify_between_cards() {
    let mut signer = selected_card();
    let mut verifier = selected_card();
    exchange(&mut signer, &mut verifier);

    let message = b"transfer 10 units".to_vec();
    let signature = ok(&mut signer, &rsa1024::sign(message.clone()));
    assert_eq!(signature.len(), RSA_MODULUS_LEN);

    let response = send(&mut verifier, &rsa1024::verify(&signature, &message));
    assert!(response.is_success());
    assert!(response.payload().is_empty());

    let mut tampered = message.clone();
    tampered[0] ^= 0x01;
    let response = send(&mut verifier, &rsa1024::verify(&signature, &tampered));
    assert_eq!(response.status().to_u16(), 0x6300);

    let mut tampered = signature.clone();
    tampered[RSA_MODULUS_LEN - 1] ^= 0x01;
    let response = send(&mut verifier, &rsa1024::verify(&tampered, &message));
    assert_eq!(response.status().to_u16(), 0x6300);

    // Session continues after a failed verification
    assert!(send(&mut verifier, &rsa1024::verify(&signature, &message)).is_success());
}

#[test]
fn short_modulus_keeps_the_stored_key() {
    let mut card = selected_card();
    let mut peer = selected_card();
    exchange(&mut peer, &mut card);
    let before = card.rsa1024().rsa_store().external_modulus().cloned();

    let response = send(&mut card, &rsa1024::set_external_modulus(vec![0xC3; 64]));
    assert_eq!(response.status().to_u16(), 0x6A80);
    assert_eq!(card.rsa1024().rsa_store().external_modulus().cloned(), before);

    let response = send(&mut card, &rsa1024::set_external_exponent(Vec::new()));
    assert_eq!(response.status().to_u16(), 0x6A87);
}

#[test]
fn regenerated_key_invalidates_old_signatures() {
    let mut signer = selected_card();
    let mut verifier = selected_card();
    exchange(&mut signer, &mut verifier);

    let signature = ok(&mut signer, &rsa1024::sign(vec![0x01, 0x02]));
    ok(&mut signer, &rsa1024::generate_key_pair());
    assert_eq!(ok(&mut signer, &rsa1024::export_exponent()), [0x01, 0x00, 0x01]);
    exchange(&mut signer, &mut verifier);

    let response = send(&mut verifier, &rsa1024::verify(&signature, &[0x01, 0x02]));
    assert_eq!(response.status().to_u16(), 0x6300);
}

#[test]
fn triple_des_round_trip() {
    let mut card = selected_card();
    let plaintext: Vec<u8> = (0u8..32).collect();

    let ciphertext = ok(&mut card, &rsa1024::des3_encrypt(plaintext.clone()));
    assert_eq!(ciphertext.len(), 32);
    assert_ne!(ciphertext, plaintext);
    assert_eq!(ok(&mut card, &rsa1024::des3_decrypt(ciphertext)), plaintext);

    let response = send(&mut card, &rsa1024::des3_encrypt(vec![0x00; 12]));
    assert_eq!(response.status().to_u16(), 0x6700);
}

#[test]
fn aes_codes_mean_rsa_here() {
    let mut card = selected_card();
    // 0x42 is AES-128 decrypt on the other service; here it is RSA decrypt,
    // which rejects anything but a full modulus-length block
    let mut frame = vec![0xB1, 0x42, 0x00, 0x00, 0x10];
    frame.extend_from_slice(&[0u8; 16]);
    let response = card.transmit_raw(&frame).unwrap();
    assert_eq!(response.as_ref(), &[0x67, 0x00]);

    let response = send(&mut card, &Command::new(0xB1, 0x26, 0x00, 0x00));
    assert_eq!(response.status().to_u16(), 0x6D00);
}

#[test]
fn new_modulus_resets_exponent() {
    let mut signer = selected_card();
    let mut verifier = selected_card();
    let modulus = ok(&mut signer, &rsa1024::export_modulus());

    ok(&mut verifier, &rsa1024::set_external_modulus(modulus.clone()));
    ok(&mut verifier, &rsa1024::set_external_exponent(vec![0x03]));
    let exponent = verifier.rsa1024().rsa_store().external_exponent().to_bytes_be();
    assert_eq!(exponent, [0x03]);

    let message = b"reset".to_vec();
    let signature = ok(&mut signer, &rsa1024::sign(message.clone()));
    let response = send(&mut verifier, &rsa1024::verify(&signature, &message));
    assert_eq!(response.status().to_u16(), 0x6300);

    ok(&mut verifier, &rsa1024::set_external_modulus(modulus));
    let exponent = verifier.rsa1024().rsa_store().external_exponent().to_bytes_be();
    assert_eq!(exponent, [0x01, 0x00, 0x01]);
    assert!(send(&mut verifier, &rsa1024::verify(&signature, &message)).is_success());
}
