//! Git Push Agent - 本地 Git 推送/发布服务器
//!
//! 为网页推送工具提供 HTTP API，执行 git 命令。
//!
//! Usage:
//! - Normal mode: `git-push-agent`
//! - With custom port: `git-push-agent --port 9000` 或 `git-push-agent 9000`
//! - Without browser: `git-push-agent --no-browser`

use git_push_agent::RuntimeConfig;

/// 解析命令行参数
///
/// 同时兼容 `--port <N>` 和历史版本的裸端口号位置参数，
/// 非数字的位置参数被忽略（回退到默认端口）。
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
            "--no-browser" => {
                config.no_browser = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                // 裸位置参数：端口号
                if config.port_override.is_none() {
                    config.port_override = other.parse().ok();
                }
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Git Push Agent - 本地 Git 推送/发布服务器");
    println!();
    println!("USAGE:");
    println!("    git-push-agent [OPTIONS] [PORT]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port (default 8765)");
    println!("    --no-browser     Do not open the browser on startup");
    println!("    -h, --help       Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    git-push-agent                # Default port, opens browser");
    println!("    git-push-agent 9000           # Custom port (positional)");
    println!("    git-push-agent --port 9000    # Custom port (flag)");
}

fn main() {
    let config = parse_args();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        git_push_agent::init_and_run(config).await;
    });
}
