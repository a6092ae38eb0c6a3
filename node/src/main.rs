//! Oracle node: serves contract verifiable randomness proofs over JSON RPC
#![deny(
    unused,
    warnings,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs,
    unused_imports
)]
#![forbid(unsafe_code)]

use bytes::Bytes;
use dotenv::dotenv;
use http_body_util::{combinators::BoxBody, BodyExt};
use hyper::{
    body::Body,
    server::conn::http1,
    service::service_fn,
    {Method, Request, Response},
};
use hyper_util::rt::TokioIo;
use libvrf::{
    extends::ScalarExtend, helper::get_address, secp256k1::curve::Scalar, ContractProof, KeyPair,
};
use node::{proof::ContractProofJson, rpc::JSONRPCMethod, NodeContext, QuickResponse};
use serde_json::json;
use std::{borrow::Borrow, env, net::SocketAddr, str::from_utf8, sync::Arc};
use tokio::net::TcpListener;

async fn vrf_get_public_key(
    context: Arc<NodeContext>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let public_key = &context.keypair().public_key;
    QuickResponse::res_json(&json!({
        "public_key": hex::encode(public_key.serialize()),
        "address": format!("0x{}", hex::encode(get_address(public_key))),
        "key_hash": format!("0x{}", hex::encode(context.key_hash())),
    }))
}

async fn vrf_new_proof(
    seed: [u8; 32],
    context: Arc<NodeContext>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let alpha = Scalar::from_bytes(&seed);
    match context.ecvrf().prove_contract(&alpha) {
        Ok(proof) => QuickResponse::res_json(&ContractProofJson::from(&proof)),
        Err(_) => QuickResponse::err(node::Error("PROVE_FAILED", "Unable to prove the seed")),
    }
}

async fn vrf_verify_proof(
    value: serde_json::Value,
    context: Arc<NodeContext>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let encoded: ContractProofJson = match serde_json::from_value(value) {
        Ok(encoded) => encoded,
        Err(_) => {
            return QuickResponse::err(node::Error("INVALID_PROOF", "Malformed proof payload"));
        }
    };
    let proof = match ContractProof::try_from(&encoded) {
        Ok(proof) => proof,
        Err(e) => return QuickResponse::err(e),
    };
    let seed = proof.seed;
    let valid = context
        .ecvrf()
        .verify_contract(&context.keypair().public_key, &seed, &proof);
    QuickResponse::res_json(&json!({ "valid": valid }))
}

/// Service handler: route JSON RPC posts, reject everything else
async fn vrf_node(
    req: Request<hyper::body::Incoming>,
    context: Arc<NodeContext>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let (header, body) = req.into_parts();
    match (&header.method, header.uri.path()) {
        (&Method::POST, "/") => {
            let max = body.size_hint().upper().unwrap_or(u64::MAX);
            // Body is 64 KB
            if max > 1024 * 64 {
                return QuickResponse::err(node::Error(
                    "PAYLOAD_TOO_LARGE",
                    "Your body too big, can not fit the body bag",
                ));
            }
            let whole_body = body
                .collect()
                .await
                .expect("Unable to collect the request body")
                .to_bytes();
            let json_string =
                from_utf8(whole_body.borrow()).expect("Unable to convert body to utf8");
            let json_rpc_payload = match JSONRPCMethod::from_json_string(json_string) {
                Ok(payload) => payload,
                Err(e) => {
                    return QuickResponse::err(e);
                }
            };

            match json_rpc_payload {
                JSONRPCMethod::VrfGetPublicKey => vrf_get_public_key(context).await,
                JSONRPCMethod::VrfNewProof(seed) => vrf_new_proof(seed, context).await,
                JSONRPCMethod::VrfVerifyProof(value) => vrf_verify_proof(value, context).await,
            }
        }
        _ => QuickResponse::err(node::Error(
            "NOT_IMPLEMENTED",
            "It is not working in this way",
        )),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let addr: SocketAddr = env::var("NODE_BIND")
        .unwrap_or_else(|_| "0.0.0.0:1337".to_string())
        .parse()?;

    let keypair = match env::var("SECRET_KEY") {
        // Get secret from .env file
        Ok(r) => KeyPair::from(r),
        // Generate an ephemeral key for this run
        Err(_) => {
            log::warn!("SECRET_KEY is not set, generating an ephemeral proving key");
            KeyPair::new()
        }
    };

    log::info!(
        "public key: {}",
        hex::encode(keypair.public_key.serialize())
    );
    log::info!(
        "address of public key: 0x{}",
        hex::encode(get_address(&keypair.public_key))
    );

    let node_context = NodeContext::new(keypair);

    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let ctx = Arc::clone(&node_context);

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service_fn(move |req| vrf_node(req, Arc::clone(&ctx))))
                .await
            {
                log::error!("error serving connection: {:?}", err);
            }
        });
    }
}
