//! Template rendering for CLI output using outstanding

use console::Style;
use footprintlib::catalog::format_intensity;
use footprintlib::{
    format_metrics_with, Catalog, Country, DisplayMetrics, DisplayOptions, FootprintResult,
    FootprintTable, Recommendation, Sections, StatisticsResponse,
};
use outstanding::Theme;
use serde::Serialize;

/// Include templates at compile time
pub const RESULTS_TEMPLATE: &str = include_str!("../templates/results.jinja");
pub const RECOMMENDATIONS_TEMPLATE: &str = include_str!("../templates/recommendations.jinja");
pub const STATISTICS_TEMPLATE: &str = include_str!("../templates/statistics.jinja");
pub const TABLE_TEMPLATE: &str = include_str!("../templates/table.jinja");
pub const COUNTRY_TEMPLATE: &str = include_str!("../templates/country.jinja");

/// Table data for template rendering (pre-formatted lines)
#[derive(Debug, Serialize)]
struct TableContext {
    title: Option<String>,
    /// Pre-padded header line
    header: String,
    /// Separator line (dashes)
    separator: String,
    /// Pre-padded data rows
    rows: Vec<String>,
    /// Pre-padded footer row
    footer: Option<String>,
}

/// Create the theme with styles
pub fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold().underlined())
        .add("header", Style::new().bold())
        .add("total", Style::new().bold())
        .add("label", Style::new().cyan())
        .add("muted", Style::new().dim())
        .add("above", Style::new().red())
        .add("below", Style::new().green())
        .add("even", Style::new())
        .add("high", Style::new().red().bold())
        .add("medium", Style::new().yellow())
        .add("low", Style::new().green())
}

fn cell<'a>(label: &'a str, values: &'a [String], column: usize) -> &'a str {
    if column == 0 {
        label
    } else {
        values.get(column - 1).map(|s| s.as_str()).unwrap_or("")
    }
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (text, width))| {
            if i == 0 {
                format!("{:<width$}", text, width = width)
            } else {
                format!("{:>width$}", text, width = width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Pad every column to its widest cell
fn table_context(table: &FootprintTable) -> TableContext {
    let columns = table.headers.len();
    let mut lines: Vec<(&str, &[String])> = table
        .rows
        .iter()
        .map(|r| (r.label.as_str(), r.values.as_slice()))
        .collect();
    if let Some(footer) = &table.footer {
        lines.push((footer.label.as_str(), footer.values.as_slice()));
    }

    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            lines
                .iter()
                .map(|(label, values)| cell(label, values, col).chars().count())
                .chain(std::iter::once(table.headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let row_line = |label: &str, values: &[String]| {
        let cells: Vec<&str> = (0..columns).map(|col| cell(label, values, col)).collect();
        pad_line(&cells, &widths)
    };

    let headers: Vec<&str> = table.headers.iter().map(|h| h.as_str()).collect();
    let total_width = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);

    TableContext {
        title: table.title.clone(),
        header: pad_line(&headers, &widths),
        separator: "-".repeat(total_width),
        rows: table
            .rows
            .iter()
            .map(|r| row_line(&r.label, &r.values))
            .collect(),
        footer: table
            .footer
            .as_ref()
            .map(|f| row_line(&f.label, &f.values)),
    }
}

/// Data context for the results template
#[derive(Debug, Serialize)]
struct ResultsContext {
    country: Option<String>,
    show_results: bool,
    metrics: DisplayMetrics,
    /// Theme style for the comparison figure
    comparison_style: &'static str,
    tables: Vec<TableContext>,
    recommendations: Vec<Recommendation>,
}

/// Context for [`RESULTS_TEMPLATE`]: headline metrics, category tables and
/// (optionally) recommendations
pub fn results_context(
    result: &FootprintResult,
    country: Option<&Country>,
    recommendations: &[Recommendation],
    sections: Sections,
    line_items: bool,
    options: &DisplayOptions,
) -> anyhow::Result<serde_json::Value> {
    let metrics = format_metrics_with(result, options);

    let mut tables = vec![table_context(&FootprintTable::categories(result, options))];
    if line_items {
        tables.push(table_context(&FootprintTable::line_items(result, &options.locale)));
    }

    let comparison_style = if result.totals.vs_global > 0.0 {
        "above"
    } else if result.totals.vs_global < 0.0 {
        "below"
    } else {
        "even"
    };

    let context = ResultsContext {
        country: country.map(|c| {
            format!(
                "{} ({})",
                c.name,
                format_intensity(c.co2_intensity, &options.locale)
            )
        }),
        show_results: sections.results,
        metrics,
        comparison_style,
        tables,
        recommendations: if sections.recommendations {
            recommendations.to_vec()
        } else {
            Vec::new()
        },
    };

    Ok(serde_json::to_value(&context)?)
}

/// Context for [`RECOMMENDATIONS_TEMPLATE`]
pub fn recommendations_context(recommendations: &[Recommendation]) -> serde_json::Value {
    serde_json::json!({ "recommendations": recommendations })
}

/// Context for [`STATISTICS_TEMPLATE`]: world summary line plus region,
/// ranking and energy tables
pub fn statistics_context(
    catalog: &Catalog,
    stats: &StatisticsResponse,
    options: &DisplayOptions,
) -> serde_json::Value {
    let locale = &options.locale;
    let summary = catalog.global_summary().map(|s| {
        serde_json::json!({
            "countries": catalog.countries.len(),
            "average": format_intensity(s.global_avg, locale),
            "min": format_intensity(s.min_intensity, locale),
            "max": format_intensity(s.max_intensity, locale),
        })
    });

    let tables = vec![
        table_context(&FootprintTable::regions(stats, locale)),
        table_context(&FootprintTable::ranking("Cleanest countries", &stats.cleanest, locale)),
        table_context(&FootprintTable::ranking(
            "Most polluting countries",
            &stats.most_polluting,
            locale,
        )),
        table_context(&FootprintTable::energy_sources(stats, locale)),
    ];

    serde_json::json!({ "summary": summary, "tables": tables })
}

/// Context for [`TABLE_TEMPLATE`]
pub fn single_table_context(table: &FootprintTable) -> serde_json::Value {
    serde_json::json!({ "table": table_context(table) })
}

/// Context for [`COUNTRY_TEMPLATE`]
pub fn country_context(country: &Country, options: &DisplayOptions) -> serde_json::Value {
    serde_json::json!({
        "code": country.code,
        "name": country.name,
        "region": country.region,
        "intensity": format_intensity(country.co2_intensity, &options.locale),
    })
}
