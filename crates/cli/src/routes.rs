use clap::Parser;
use console::style;
use golinks_sdk::Route;

use crate::Context;

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct GetCommand {
    /// Name to look up
    pub name: String,
}

impl GetCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let route = ctx
            .client()?
            .get_route(&self.name)
            .await
            .map_err(|e| e.to_string())?;

        println!("{}", describe(&route));
        Ok(())
    }
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct SetCommand {
    /// Name to assign
    pub name: String,

    /// URL the name should point at
    pub url: String,
}

impl SetCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let route = ctx
            .client()?
            .post_route(&self.name, &self.url)
            .await
            .map_err(|e| e.to_string())?;

        println!("{} {}", style("✓").green(), describe(&route));
        Ok(())
    }
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct DeleteCommand {
    /// Name to delete
    pub name: String,
}

impl DeleteCommand {
    pub async fn execute(&self, ctx: &Context) -> Result<(), String> {
        let route = ctx
            .client()?
            .delete_route(&self.name)
            .await
            .map_err(|e| e.to_string())?;

        println!("{} Deleted {}", style("✓").green(), style(&route.name).bold());
        Ok(())
    }
}

fn describe(route: &Route) -> String {
    if route.is_assigned() {
        format!("{} -> {}", style(&route.name).bold(), route.url)
    } else {
        format!("{} is not assigned", style(&route.name).bold())
    }
}
