//! Order listing, summary and export commands.
//!
//! Each command fetches one month of orders with the dashboard's WooCommerce
//! client, then runs the same filter and sort pipeline as the orders page.

use std::path::Path;

use clap::{Args, ValueEnum};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use floresta_core::query::{FulfillmentFilter, OrderFilters, SortDirection, SortKey, SortState, StatusFilter};
use floresta_core::{Metrics, NormalizedOrder, OrderStatus, select_and_sort, summarize};
use floresta_dashboard::filters::{format_clp, status_label};
use floresta_dashboard::{FetchWindow, WooClient, WooConfig};

/// Argument errors, reported before any request is made.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid --{0}: {1}")]
    InvalidArgument(&'static str, String),
    #[error("Invalid --month {0} (expected YYYY-MM)")]
    InvalidMonth(String),
}

/// Filter, sort and window flags shared by every orders command.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Status code to keep (`all` keeps every status)
    #[arg(long, default_value = "all")]
    pub status: String,

    /// `all`, `delivery` or `pickup`
    #[arg(long, default_value = "all")]
    pub logistics: String,

    /// Free-text search over id, names, phones, date, address and notes
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Sort column: id, customer, reservation, logistics, message, status, total
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction (asc/desc); defaults to the column's own direction
    #[arg(long, requires = "sort")]
    pub dir: Option<String>,

    /// Month to fetch, `YYYY-MM` (current month when omitted)
    #[arg(short, long)]
    pub month: Option<String>,
}

/// Export serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl QueryArgs {
    /// Filter criteria from the flags.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidArgument` for an unknown logistics value.
    /// An unknown status code is only warned about, since stores may define
    /// their own.
    pub fn filters(&self) -> Result<OrderFilters, CommandError> {
        let fulfillment = self
            .logistics
            .parse::<FulfillmentFilter>()
            .map_err(|e| CommandError::InvalidArgument("logistics", e))?;
        let status = StatusFilter::parse(&self.status);
        if let StatusFilter::Only(code) = &status
            && !code.is_known()
        {
            let known: Vec<&str> = OrderStatus::KNOWN.iter().map(OrderStatus::as_str).collect();
            warn!(status = %code, known = %known.join(", "), "Unrecognized --status");
        }
        Ok(OrderFilters {
            status,
            fulfillment,
            search: self.search.clone(),
        })
    }

    /// Requested sort, if any.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidArgument` for an unknown key or direction.
    pub fn sort_state(&self) -> Result<Option<SortState>, CommandError> {
        let Some(key) = self.sort.as_deref() else {
            return Ok(None);
        };
        let key = key
            .parse::<SortKey>()
            .map_err(|e| CommandError::InvalidArgument("sort", e))?;
        let direction = match self.dir.as_deref() {
            Some(dir) => dir
                .parse::<SortDirection>()
                .map_err(|e| CommandError::InvalidArgument("dir", e))?,
            None => key.default_direction(),
        };
        Ok(Some(SortState { key, direction }))
    }

    /// Fetch window from `--month`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidMonth` for anything but a real `YYYY-MM`.
    pub fn window(&self) -> Result<FetchWindow, CommandError> {
        self.month.as_deref().map_or_else(
            || Ok(FetchWindow::this_month()),
            |key| FetchWindow::parse_month(key).ok_or_else(|| CommandError::InvalidMonth(key.to_string())),
        )
    }
}

/// Filter, then apply the optional table sort.
///
/// # Errors
///
/// Returns `CommandError` for malformed filter or sort flags.
pub fn select<'a>(
    orders: &'a [NormalizedOrder],
    args: &QueryArgs,
) -> Result<Vec<&'a NormalizedOrder>, CommandError> {
    let selected = select_and_sort(orders, &args.filters()?);
    Ok(match args.sort_state()? {
        Some(state) => state.apply(&selected),
        None => selected,
    })
}

/// One listing line.
#[must_use]
pub fn format_line(order: &NormalizedOrder) -> String {
    let logistics = if order.is_pickup { "Retiro" } else { "Envío" };
    let total = order.total.map_or_else(|| "Sin total".to_string(), format_clp);
    format!(
        "#{} | {} | {} | {} {} | {} | {}",
        order.id,
        status_label(order.status.as_str()),
        order.customer_name,
        order.delivery_date_label,
        order.delivery_slot,
        logistics,
        total
    )
}

/// Summary lines for `metrics`.
#[must_use]
pub fn format_summary(metrics: &Metrics) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Pedidos: {} ({})",
            metrics.order_count,
            format_clp(metrics.total_amount)
        ),
        format!(
            "Envíos: {} ({})",
            metrics.delivery_count,
            format_clp(metrics.delivery_amount)
        ),
        format!(
            "Retiros: {} ({})",
            metrics.pickup_count,
            format_clp(metrics.pickup_amount)
        ),
        format!("Ticket promedio: {}", format_clp(metrics.average_ticket())),
    ];
    if metrics.unpriced_count > 0 {
        lines.push(format!("Sin total: {}", metrics.unpriced_count));
    }
    lines
}

/// Serialize orders for export.
///
/// # Errors
///
/// Returns the serializer's error.
pub fn render_export(
    orders: &[&NormalizedOrder],
    format: ExportFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ExportFormat::Json => serde_json::to_string_pretty(orders)?,
        ExportFormat::Yaml => serde_yaml::to_string(orders)?,
    })
}

async fn fetch(args: &QueryArgs) -> Result<Vec<NormalizedOrder>, Box<dyn std::error::Error>> {
    // Validate flags before touching the network
    args.filters()?;
    args.sort_state()?;
    let window = args.window()?;

    let config = WooConfig::from_env()?;
    let client = WooClient::new(&config)?;
    Ok(client.fetch_normalized(window).await?)
}

/// `orders list`
///
/// # Errors
///
/// Returns an error if the flags are invalid or the fetch fails.
pub async fn list(args: &QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let orders = fetch(args).await?;
    let selected = select(&orders, args)?;

    for order in &selected {
        info!("{}", format_line(order));
    }
    info!(shown = selected.len(), fetched = orders.len(), "Listed orders");
    Ok(())
}

/// `orders summary`
///
/// # Errors
///
/// Returns an error if the flags are invalid or the fetch fails.
pub async fn summary(args: &QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let orders = fetch(args).await?;
    let selected = select(&orders, args)?;

    for line in format_summary(&summarize(selected.iter().copied())) {
        info!("{line}");
    }
    Ok(())
}

/// `orders export`
///
/// # Errors
///
/// Returns an error if the flags are invalid, the fetch fails or the output
/// cannot be written.
pub async fn export(
    args: &QueryArgs,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let orders = fetch(args).await?;
    let selected = select(&orders, args)?;
    let content = render_export(&selected, format)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, content).await?;
            info!(path = %path.display(), count = selected.len(), "Exported orders");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
