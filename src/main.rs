//! jar-deploy-agent - remote JVM deployment agent
//!
//! Usage:
//! - Normal mode: `jar-deploy-agent`
//! - With custom port: `jar-deploy-agent --port 19999`

use jar_deploy_agent::RuntimeConfig;

/// Parses command line arguments.
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("jar-deploy-agent - remote JVM deployment agent");
    println!();
    println!("USAGE:");
    println!("    jar-deploy-agent [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port");
    println!("    -h, --help       Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    jar-deploy-agent                 # Normal mode");
    println!("    jar-deploy-agent --port 19999    # Custom port");
}

fn main() {
    let config = parse_args();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        jar_deploy_agent::init_and_run(config).await;
    });
}
