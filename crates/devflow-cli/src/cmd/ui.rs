use anyhow::Context;
use devflow_core::config::Config;
use std::path::Path;

/// Start the web API server, binding first so `--port 0` reports the
/// OS-assigned port before serving.
pub fn run(root: &Path, port: u16, no_open: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let name = config.workspace.name.clone();

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .context("failed to bind port")?;
        let actual_port = listener.local_addr()?.port();
        println!("devflow UI for '{name}' → http://localhost:{actual_port}");

        devflow_server::serve_on(root_buf, listener, !no_open).await
    })
}
