use std::env;

#[tokio::main]
async fn main() {
    buy_vs_rent::api::init_tracing();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if let Err(e) = buy_vs_rent::api::run_http_server(port).await {
            tracing::error!("Server error: {e:#}");
            std::process::exit(1);
        }
        return;
    }

    match buy_vs_rent::api::run_cli(raw_args) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
