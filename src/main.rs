use api::{Bot, Config, RestGateway, Timing};
use core::{convert::Infallible, time::Duration};
use hyper::{server::conn::http1, service::service_fn, Response};
use hyper_util::rt::TokioIo;
use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port: u16 = env::var("PORT")?.parse()?;
    let base = env::var("API_URL")?;
    let token = env::var("TOKEN")?;
    let mut public = [0; 32];
    hex::decode_to_slice(env::var("PUBLIC_KEY")?, &mut public)?;
    let public = ed25519_dalek::VerifyingKey::from_bytes(&public)?;

    let mut config = Config {
        moderator: env::var("MODERATOR_CONVERSATION_ID").ok(),
        quiz: env::var("QUIZ_CONVERSATION_ID").ok(),
        ..Default::default()
    };
    if let Ok(trigger) = env::var("TRIGGER") {
        config.trigger = trigger.into_boxed_str();
    }
    if let Ok(window) = env::var("ANSWER_WINDOW") {
        config.timing = Timing::with_answer_window(Duration::from_secs(window.parse()?));
    }

    // Initialize service handler
    let runtime = Runtime::new()?;
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = runtime.block_on(TcpListener::bind(addr))?;
    let bot = Bot::new(RestGateway::new(&base, token), config);
    log::info!("listening on {addr}");

    runtime.block_on(async move {
        let mut stop = core::pin::pin!(tokio::signal::ctrl_c());
        loop {
            let (stream, peer) = tokio::select! {
                biased;
                result = &mut stop => {
                    result?;
                    break;
                }
                result = listener.accept() => result?,
            };

            let outer = bot.clone();
            let service = service_fn(move |req| {
                let inner = outer.clone();
                async move {
                    let res = match api::try_respond(req, &inner, &public).await {
                        Ok(res) => res,
                        Err(code) => {
                            let mut res = Response::new(Default::default());
                            *res.status_mut() = code;
                            res
                        }
                    };
                    Ok::<_, Infallible>(res)
                }
            });

            tokio::spawn(async move {
                if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                    log::error!("connection with {peer} failed: {err}");
                }
            });
        }

        log::info!("shutting down");
        anyhow::Ok(())
    })?;

    Ok(())
}
