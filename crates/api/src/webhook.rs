use crate::{bot::Bot, gateway::Gateway};
use ed25519_dalek::{Signature, VerifyingKey};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::{Body, Bytes},
    Method, Request, Response, StatusCode,
};

/// Checks the platform's signature over `timestamp || body`.
pub fn verify(key: &VerifyingKey, timestamp: &str, signature: &str, body: &[u8]) -> Result<(), StatusCode> {
    let signature = hex::decode(signature).map_err(|_| StatusCode::BAD_REQUEST)?;
    let signature = Signature::from_slice(&signature).map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body);
    key.verify_strict(&message, &signature).map_err(|_| StatusCode::UNAUTHORIZED)
}

pub async fn try_respond<G, B>(req: Request<B>, bot: &Bot<G>, key: &VerifyingKey) -> Result<Response<Full<Bytes>>, StatusCode>
where
    G: Gateway,
    B: Body,
{
    // Disallow non-POST methods and unexpected paths
    if req.method() != Method::POST || req.uri().path() != "/" {
        return Err(StatusCode::NOT_FOUND);
    }

    // Retrieve security headers
    let headers = req.headers();
    let maybe_sig = headers.get("X-Signature-Ed25519").and_then(|val| val.to_str().ok());
    let maybe_time = headers.get("X-Signature-Timestamp").and_then(|val| val.to_str().ok());
    let (signature, timestamp) = maybe_sig.zip(maybe_time).ok_or(StatusCode::BAD_REQUEST)?;
    let (signature, timestamp) = (String::from(signature), String::from(timestamp));

    let body = req.into_body().collect().await.map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?.to_bytes();
    verify(key, &timestamp, &signature, &body)?;

    // Parse incoming event
    let event = serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
    drop(body);
    bot.on_event(event).await;

    let mut res = Response::new(Full::default());
    *res.status_mut() = StatusCode::NO_CONTENT;
    Ok(res)
}
