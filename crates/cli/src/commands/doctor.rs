use parley_core::config::{AppConfig, LoadOptions};
use parley_db::{connect_with_settings, open_connection};
use serde::Serialize;
use sqlx::Connection;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Exit code 1 when any check fails, so the command can gate deploys.
pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config_validation",
                "configuration loaded and validated",
            ));
            checks.push(check_llm_configuration(&config));
            checks.extend(check_store_connectivity(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            checks.push(DoctorCheck::skipped("llm_configuration"));
            checks.push(DoctorCheck::skipped("submission_store"));
            checks.push(DoctorCheck::skipped("profile_store"));
        }
    }

    // The model service is optional: a missing endpoint degrades the fallback
    // and extraction steps but does not stop the server.
    let failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_llm_configuration(config: &AppConfig) -> DoctorCheck {
    if config.llm_ready() {
        DoctorCheck::pass(
            "llm_configuration",
            format!("deployment `{}` at configured endpoint", config.llm.deployment),
        )
    } else {
        DoctorCheck {
            name: "llm_configuration",
            status: CheckStatus::Skipped,
            details: "endpoint or api key unset; model-assisted steps will apologise".to_string(),
        }
    }
}

fn check_store_connectivity(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            let details = format!("failed to initialize async runtime: {error}");
            return vec![
                DoctorCheck::fail("submission_store", details.clone()),
                DoctorCheck::fail("profile_store", details),
            ];
        }
    };

    runtime.block_on(async {
        let submission = match open_connection(&config.database.url, config.database.timeout_secs)
            .await
        {
            Ok(mut conn) => match conn.ping().await {
                Ok(()) => {
                    let _ = conn.close().await;
                    DoctorCheck::pass(
                        "submission_store",
                        format!("connected using `{}`", config.database.url),
                    )
                }
                Err(error) => DoctorCheck::fail("submission_store", format!("ping failed: {error}")),
            },
            Err(error) => DoctorCheck::fail(
                "submission_store",
                format!("failed to connect to submission store: {error}"),
            ),
        };

        let profile = match connect_with_settings(
            &config.profile.url,
            config.profile.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => {
                let probe = sqlx::query("SELECT 1").execute(&pool).await;
                pool.close().await;
                match probe {
                    Ok(_) => DoctorCheck::pass(
                        "profile_store",
                        format!("connected using `{}`", config.profile.url),
                    ),
                    Err(error) => {
                        DoctorCheck::fail("profile_store", format!("probe query failed: {error}"))
                    }
                }
            }
            Err(error) => DoctorCheck::fail(
                "profile_store",
                format!("failed to connect to profile store: {error}"),
            ),
        };

        vec![submission, profile]
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
