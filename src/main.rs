use std::env;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = match raw_args.get(2) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    eprintln!("Invalid port '{raw}'; expected 0-65535");
                    std::process::exit(1);
                }
            },
            None => 8080,
        };
        if let Err(e) = payoff::api::run_http_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    eprintln!("Usage: payoff serve [port]");
    std::process::exit(1);
}
