use libvrf::{
    extends::ScalarExtend,
    helper::{get_address, hash_of_key},
    secp256k1::curve::Scalar,
    KeyPair, ECVRF,
};

fn main() {
    let key_pair = KeyPair::new();
    println!("Public key: {:?}", key_pair.public_key.serialize());
    println!(
        "Address: 0x{}",
        hex::encode(get_address(&key_pair.public_key))
    );
    println!(
        "Key hash: 0x{}",
        hex::encode(hash_of_key(&key_pair.public_key))
    );

    let ecvrf = ECVRF::new(key_pair.secret_key);
    let alpha = Scalar::randomize();

    let proof = ecvrf.prove(&alpha).expect("Failed to prove the seed");
    println!("proof: {:#?}", proof);
    println!(
        "verified: {:?}",
        ecvrf.verify(ecvrf.public_key(), &alpha, &proof)
    );
    println!("output: {:?}", ecvrf.compute(&proof));

    let contract_proof = ecvrf
        .prove_contract(&alpha)
        .expect("Failed to prove the seed");
    println!("contract proof: {:#?}", contract_proof);
    println!(
        "contract verified: {:?}",
        ecvrf.verify_contract(ecvrf.public_key(), &alpha, &contract_proof)
    );
}
