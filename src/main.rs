use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use arith_mcp::server::LogFilterHandle;
use arith_mcp::CalculatorServer;
use clap::{Parser, ValueEnum};
use rmcp::{
    transport::{
        stdio,
        streamable_http_server::{session::local::LocalSessionManager, StreamableHttpService},
    },
    ServiceExt,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Parser)]
#[command(name = "arith-mcp", version, about = "Arithmetic calculator MCP server")]
struct Args {
    /// 使用するトランスポート
    #[arg(long, value_enum, env = "ARITH_MCP_TRANSPORT", default_value = "stdio")]
    transport: Transport,

    /// HTTPトランスポートの待ち受けアドレス
    #[arg(long, env = "ARITH_MCP_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout はJSON-RPC専用なのでログは stderr へ
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, log_filter) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .init();

    let args = Args::parse();
    match args.transport {
        Transport::Stdio => serve_stdio(log_filter).await,
        Transport::Http => serve_http(args.bind, log_filter).await,
    }
}

async fn serve_stdio(log_filter: LogFilterHandle) -> Result<()> {
    info!("starting arith-mcp on stdio");
    let service = CalculatorServer::new()
        .with_log_filter(log_filter)
        .serve(stdio())
        .await
        .inspect_err(|e| error!("serving error: {:?}", e))?;
    service.waiting().await?;
    Ok(())
}

async fn serve_http(bind: SocketAddr, log_filter: LogFilterHandle) -> Result<()> {
    let service = StreamableHttpService::new(
        move || Ok(CalculatorServer::new().with_log_filter(log_filter.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("starting arith-mcp on http://{}/mcp", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// シグナルを待つ。待ち受けに失敗した場合はログを出して停止しない
async fn shutdown_signal(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("shutting down"),
        Err(e) => {
            error!("failed to listen for ctrl-c: {:?}", e);
            std::future::pending::<()>().await;
        }
    }
}
