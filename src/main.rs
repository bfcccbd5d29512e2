use std::env;

use clap::Parser;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = benefitgap::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some("calc") => {
            let args = benefitgap::api::CalcArgs::parse_from(env::args().skip(1));
            match benefitgap::api::run_calc(args) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: cargo run -- serve [port] | cargo run -- calc [--options]");
            std::process::exit(1);
        }
    }
}
