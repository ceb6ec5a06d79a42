use anyhow::Context;
use chrono::Utc;
use clap::Args;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::{Severity, Threshold};
use crate::services::evaluator;

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long, short = 'f', help = "Thresholds file (.yaml, .yml or .json)")]
    pub thresholds: PathBuf,

    #[arg(long, help = "Measurement field of the reading")]
    pub field: String,

    #[arg(long, allow_negative_numbers = true, help = "Measured value")]
    pub value: f64,

    #[arg(long, help = "Only consider thresholds for this asset sensor")]
    pub sensor: Option<Uuid>,
}

/// One entry of a thresholds file.
#[derive(Debug, Deserialize)]
struct ThresholdEntry {
    id: Option<Uuid>,
    asset_sensor_id: Option<Uuid>,
    measurement_field: String,
    min_value: Option<f64>,
    max_value: Option<f64>,
    #[serde(default = "default_severity")]
    severity: Severity,
    alert_message: Option<String>,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_severity() -> Severity {
    Severity::Warning
}

fn default_active() -> bool {
    true
}

impl ThresholdEntry {
    fn into_threshold(self) -> Threshold {
        let now = Utc::now();
        Threshold {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            tenant_id: None,
            asset_sensor_id: self.asset_sensor_id.unwrap_or_else(Uuid::nil),
            sensor_type_id: None,
            measurement_field: self.measurement_field,
            min_value: self.min_value,
            max_value: self.max_value,
            severity: self.severity,
            alert_message: self.alert_message,
            notification_rules: None,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn handle(args: CheckArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    if !args.value.is_finite() {
        anyhow::bail!("value must be a finite number");
    }

    let thresholds: Vec<Threshold> = load_thresholds(&args.thresholds)?
        .into_iter()
        .filter(|t| args.sensor.map_or(true, |s| t.asset_sensor_id == s))
        .collect();

    let evaluated = thresholds.iter().filter(|t| evaluator::applicable(t, &args.field)).count();
    let breaches = evaluator::evaluate(&args.field, args.value, &thresholds);

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Reading evaluated",
            Some(json!({
                "measurement_field": args.field,
                "value": args.value,
                "evaluated_thresholds": evaluated,
                "breaches": breaches,
            })),
        ),
        OutputFormat::Text => {
            if evaluated == 0 {
                println!("No applicable thresholds for '{}'", args.field);
            } else if breaches.is_empty() {
                println!("✓ {} = {} is within {} threshold(s)", args.field, args.value, evaluated);
            } else {
                for breach in &breaches {
                    println!("[{}] {} ({})", breach.severity, breach.message, breach.threshold_id);
                }
            }
            Ok(())
        }
    }
}

fn load_thresholds(path: &Path) -> anyhow::Result<Vec<Threshold>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let entries = parse_entries(&raw, path)?;
    Ok(entries.into_iter().map(ThresholdEntry::into_threshold).collect())
}

fn parse_entries(raw: &str, path: &Path) -> anyhow::Result<Vec<ThresholdEntry>> {
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let entries = if is_json {
        serde_json::from_str(raw).with_context(|| format!("invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(raw).with_context(|| format!("invalid YAML in {}", path.display()))?
    };
    Ok(entries)
}
