use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = env::var("PUNCTUM_ADDR")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| punctum_service::DEFAULT_ADDR.to_string());

    punctum_service::clear_shutdown_flag();
    log::info!("listening on {addr}");
    if let Err(err) = punctum_service::start_server(&addr) {
        log::error!("server exited: {err}");
        std::process::exit(1);
    }
}
