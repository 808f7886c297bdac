use clap::Parser;
use console::style;

use crate::Context;

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct ConfigCommand {}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let service = ctx
            .client()?
            .get_config()
            .await
            .map_err(|e| format!("Failed to fetch service config: {}", e))?;

        let config = &ctx.client_config;
        println!("{}", style("Service").bold());
        println!("  endpoint:   {}", config.endpoint);
        println!(
            "  host:       {}",
            if service.host.is_empty() {
                "(none)"
            } else {
                service.host.as_str()
            }
        );
        println!("{}", style("Client").bold());
        println!("  page size:  {}", config.page_size);
        println!("  timeout:    {}ms", config.timeout_ms);
        println!(
            "  generated:  {}",
            if config.include_generated_names {
                "included"
            } else {
                "hidden"
            }
        );

        Ok(())
    }
}
