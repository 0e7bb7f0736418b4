use crate::settings::Settings;
use anyhow::Result;

pub fn run(settings: &Settings, port: Option<u16>, no_open: bool) -> Result<()> {
    let mut config = settings.config.clone();
    if let Some(p) = port {
        config.server.port = p;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server.port)).await?;
        let actual_port = listener.local_addr()?.port();
        let url = format!("http://localhost:{actual_port}");

        println!("RDM status for {} → {url}", config.device.url);

        tokio::select! {
            res = rdm_server::serve_on(config, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
