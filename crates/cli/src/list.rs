use clap::Parser;
use console::style;
use futures::{StreamExt, TryStreamExt};
use golinks_sdk::{LinksClient, Route};

use crate::Context;

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct ListCommand {
    /// Output format: json or pretty (default: pretty)
    #[arg(long = "format", short = 'f', default_value = "pretty")]
    pub format: OutputFormat,

    /// Include generated (`:xyz`) names
    #[arg(long = "include-generated")]
    pub include_generated: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Json,
    Pretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(format!(
                "Invalid format: {}. Valid options are: json, pretty",
                s
            )),
        }
    }
}

impl ListCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let mut config = ctx.client_config.clone();
        if self.include_generated {
            config = config.with_generated_names(true);
        }
        let client = LinksClient::new(config).map_err(|e| e.to_string())?;

        let host = client
            .get_config()
            .await
            .map_err(|e| format!("Failed to fetch service config: {}", e))?
            .host;

        let routes = client.all_routes();

        match self.format {
            OutputFormat::Json => {
                let all: Vec<Route> = routes
                    .attach()
                    .try_collect()
                    .await
                    .map_err(|e| e.to_string())?;
                let json = serde_json::to_string_pretty(&all)
                    .map_err(|e| format!("Failed to serialize routes: {}", e))?;
                println!("{}", json);
            }
            OutputFormat::Pretty => {
                // Printed as each page lands
                let mut attachment = routes.attach();
                while let Some(route) = attachment.next().await {
                    let route = route.map_err(|e| e.to_string())?;
                    println!("{}", format_route(&route, &host));
                }

                if routes.buffered() == 0 {
                    eprintln!("No routes defined.");
                } else {
                    eprintln!(
                        "\n{} {} routes",
                        style("✓").green(),
                        routes.buffered()
                    );
                }
            }
        }

        Ok(())
    }
}

/// One line per route: the short link, then where it goes
pub fn format_route(route: &Route, host: &str) -> String {
    let short = if host.is_empty() {
        route.name.clone()
    } else {
        route.short_url(host)
    };
    format!("{}  {}", style(short).bold(), style(&route.url).dim())
}
