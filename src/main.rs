use anyhow::{Context, Result};

use attention_heatmap::logging::{log, obj, v_str, Domain, Level};
use attention_heatmap::style::StyleContext;
use attention_heatmap::{Config, HeatmapWidget, Page};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let style = match std::env::var("HEATMAP_CSS") {
        Ok(path) => StyleContext::load(&path)?,
        Err(_) => StyleContext::new(),
    };
    let page = Page::new(style, cfg.grid_width_px);
    let widget = HeatmapWidget::mount_http(page, cfg)?;

    let once = std::env::var("HEATMAP_ONCE")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    if once {
        widget.refresh().await;
    } else {
        let handle = widget.start();
        tokio::signal::ctrl_c()
            .await
            .context("waiting for ctrl-c")?;
        log(
            Level::Info,
            Domain::System,
            "shutdown",
            obj(&[("msg", v_str("ctrl-c"))]),
        );
        handle.stop().await;
    }

    let html = widget.snapshot_html();
    match std::env::var("HEATMAP_OUT") {
        Ok(path) => std::fs::write(&path, html).with_context(|| format!("writing {}", path))?,
        Err(_) => println!("{}", html),
    }
    Ok(())
}
