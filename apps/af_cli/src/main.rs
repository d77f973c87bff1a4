// apps/af_cli/src/main.rs

//! AeroFlow 命令行界面
//!
//! 二维可压缩流求解器的命令行工具。
//!
//! 应用层只做装配：解析控制文件、读入网格与可选的浸入边界/重启
//! 状态，驱动求解器外层循环，并把周期输出写到磁盘。任何致命错误
//! 打印一行诊断后以非零码退出。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// AeroFlow 可压缩流求解器命令行工具
#[derive(Parser)]
#[command(name = "af_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AeroFlow compressible flow solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 校验控制文件
    Validate(commands::validate::ValidateArgs),
    /// 查看控制文件与网格概要
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
