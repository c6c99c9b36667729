use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use antenatal_core::config::utc_offset_from_env_value;
use antenatal_core::constants::PLACEHOLDER;
use antenatal_core::dating::{calculate_edd_from_lmp, gestational_age};
use antenatal_core::format::format_date;
use antenatal_core::{
    parse_iso_date, parse_optional_iso_date, Clock, CoreConfig, CoreResult, DatingSummary,
    EddOverride, GestationalAge, PregnancyDates, SystemClock, Trimester,
};

#[derive(Parser)]
#[command(name = "antenatal")]
#[command(about = "Antenatal pregnancy dating CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimated due date from the last menstrual period
    Edd {
        /// LMP date (YYYY-MM-DD)
        lmp: String,
    },
    /// Gestational age in completed weeks and days
    GestationalAge {
        /// LMP date (YYYY-MM-DD)
        #[arg(long)]
        lmp: Option<String>,
        /// Scan EDD (YYYY-MM-DD); takes precedence over the LMP
        #[arg(long)]
        scan_edd: Option<String>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },
    /// Trimester for a number of completed weeks
    Trimester {
        /// Completed gestational weeks
        #[arg(allow_negative_numbers = true)]
        weeks: i64,
    },
    /// Full dating summary
    Summary {
        /// LMP date (YYYY-MM-DD)
        #[arg(long)]
        lmp: String,
        /// Scan EDD (YYYY-MM-DD)
        #[arg(long)]
        scan_edd: Option<String>,
        /// Clinician-corrected EDD (YYYY-MM-DD)
        #[arg(long)]
        corrected_edd: Option<String>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Edd { lmp }) => {
            let lmp = parse_iso_date(&lmp)?;
            let edd = calculate_edd_from_lmp(lmp);
            println!("EDD: {} ({})", edd, format_date(edd));
        }
        Some(Commands::GestationalAge {
            lmp,
            scan_edd,
            today,
        }) => {
            let today = resolve_today(today.as_deref())?;
            let ga = gestational_age(
                parse_optional_iso_date(lmp.as_deref())?,
                parse_optional_iso_date(scan_edd.as_deref())?,
                today,
            );
            println!("{}", render_gestational_age(ga));
        }
        Some(Commands::Trimester { weeks }) => {
            let trimester = Trimester::from_weeks(weeks);
            println!("{} ({})", trimester.number(), trimester.label());
        }
        Some(Commands::Summary {
            lmp,
            scan_edd,
            corrected_edd,
            today,
            json,
        }) => {
            let today = resolve_today(today.as_deref())?;
            let corrected_edd = parse_optional_iso_date(corrected_edd.as_deref())?;
            let dates = PregnancyDates::new(parse_iso_date(&lmp)?)
                .with_scan_edd(parse_optional_iso_date(scan_edd.as_deref())?)
                .with_edd_override(EddOverride::from_flag(
                    corrected_edd.is_some(),
                    corrected_edd,
                ));
            let summary = DatingSummary::compute(&dates, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", render_summary(&summary));
            }
        }
        None => {
            println!("Use 'antenatal --help' for commands");
        }
    }

    Ok(())
}

/// The explicit `--today` when given, otherwise the current day in the configured offset.
fn resolve_today(today: Option<&str>) -> CoreResult<NaiveDate> {
    if let Some(today) = parse_optional_iso_date(today)? {
        return Ok(today);
    }
    let offset = utc_offset_from_env_value(std::env::var("ANTENATAL_UTC_OFFSET").ok())?;
    let cfg = CoreConfig::new(offset);
    Ok(SystemClock::new(cfg.utc_offset()).today())
}

fn render_gestational_age(ga: Option<GestationalAge>) -> String {
    match ga {
        Some(ga) => format!(
            "{} weeks {} days ({})",
            ga.weeks,
            ga.days,
            ga.trimester().label()
        ),
        None => PLACEHOLDER.to_string(),
    }
}

fn render_summary(summary: &DatingSummary) -> String {
    let ga = summary.gestational_age;
    let countdown = if summary.is_due {
        "Due".to_string()
    } else {
        format!("{} days to go", summary.days_until_edd)
    };

    [
        format!("Today:           {}", format_date(summary.today)),
        format!("Gestational age: {} weeks {} days", ga.weeks, ga.days),
        format!("Trimester:       {}", summary.trimester.label()),
        format!(
            "Estimated EDD:   {} ({})",
            format_date(summary.estimated_edd),
            summary.estimated_edd_source.attribution()
        ),
        format!(
            "Final EDD:       {} ({})",
            format_date(summary.final_edd),
            summary.final_edd_source.attribution()
        ),
        format!("Countdown:       {}", countdown),
        format!("Progress:        {:.0}%", summary.progress_percent),
    ]
    .join("\n")
}
