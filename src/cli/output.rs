//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use crate::config::{ConfigHasher, ValidationReport};
use crate::edge::EdgeOutcome;
use crate::publish::{PublishRecord, StackChange};
use crate::synth::CloudAssembly;
use crate::waf::{Statement, WafRule};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Web ACL rule row for table display.
#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Priority")]
    priority: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Effect")]
    effect: String,
    #[tabled(rename = "Statement")]
    statement: String,
}

/// Template resource row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Stack")]
    stack: String,
    #[tabled(rename = "Logical ID")]
    logical_id: String,
    #[tabled(rename = "Type")]
    resource_type: String,
}

/// Stack change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Stack")]
    stack: String,
    #[tabled(rename = "Change")]
    change: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a validation report.
    #[must_use]
    pub fn format_validation(&self, report: &ValidationReport, show_warnings: bool) -> String {
        let config = &report.configuration;
        match self.format {
            OutputFormat::Json => to_json(&ValidationJson {
                valid: true,
                domain: config.domain(),
                base_domain: config.base_domain(),
                www: config.www().map(|w| w.domain.as_str()),
                cloudfront: config.add_cloudfront(),
                basic_auth_users: config
                    .basic_auth_credentials()
                    .map(|c| c.keys().map(String::as_str).collect())
                    .unwrap_or_default(),
                branch: &config.github().branch,
                warnings: &report.warnings,
            }),
            OutputFormat::Text => {
                let mut output = format!("{} Configuration is valid!\n", "✓".green());

                if show_warnings && !report.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &report.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                let github = config.github();
                output.push_str("\nConfiguration summary:\n");
                let _ = writeln!(output, "   Domain: {}", config.domain());
                let _ = writeln!(output, "   Base domain: {}", config.base_domain());
                if let Some(www) = config.www() {
                    let _ = writeln!(output, "   WWW: {}", www.domain);
                }
                let _ = writeln!(
                    output,
                    "   Source: {}/{}@{}",
                    github.owner, github.repo, github.branch
                );
                let _ = writeln!(
                    output,
                    "   CloudFront: {}",
                    if config.add_cloudfront() { "yes" } else { "no" }
                );
                if let Some(credentials) = config.basic_auth_credentials() {
                    let _ = writeln!(output, "   Basic auth users: {}", credentials.len());
                }
                output
            }
        }
    }

    /// Formats the web ACL rules.
    #[must_use]
    pub fn format_rules(&self, rules: &[WafRule]) -> String {
        match self.format {
            OutputFormat::Json => to_json(&rules),
            OutputFormat::Text => {
                let rows: Vec<RuleRow> = rules
                    .iter()
                    .map(|rule| RuleRow {
                        priority: rule.priority,
                        name: rule.name.clone(),
                        effect: Self::format_effect(&rule.effect()),
                        statement: Self::format_statement(&rule.statement),
                    })
                    .collect();

                let mut output = format!("\nWeb ACL rules ({}):\n\n", rules.len());
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats a synthesized assembly.
    #[must_use]
    pub fn format_assembly(&self, assembly: &CloudAssembly, written: &[PathBuf]) -> String {
        match self.format {
            OutputFormat::Json => to_json(&AssemblyJson {
                manifest: &assembly.manifest,
                files: written.iter().map(|p| p.display().to_string()).collect(),
                warnings: &assembly.warnings,
            }),
            OutputFormat::Text => {
                let hasher = ConfigHasher::new();
                let mut output = String::new();

                let rows: Vec<ResourceRow> = assembly
                    .stacks
                    .iter()
                    .flat_map(|stack| {
                        stack.template.resources.iter().map(|(id, resource)| ResourceRow {
                            stack: stack.name.clone(),
                            logical_id: Self::truncate(id, 40),
                            resource_type: resource.resource_type.clone(),
                        })
                    })
                    .collect();

                let _ = write!(
                    output,
                    "\nCloud assembly ({} stacks, {} resources)\n",
                    assembly.stacks.len(),
                    assembly.resource_count()
                );
                let _ = write!(
                    output,
                    "   Fingerprint: {}\n\n",
                    hasher.short_hash(&assembly.manifest.fingerprint)
                );
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');

                if !written.is_empty() {
                    output.push_str("\nFiles:\n");
                    for path in written {
                        let _ = writeln!(output, "   {}", path.display());
                    }
                }

                if !assembly.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &assembly.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats the result of a dry-run viewer request.
    #[must_use]
    pub fn format_outcome(&self, outcome: &EdgeOutcome) -> String {
        match self.format {
            OutputFormat::Json => to_json(outcome),
            OutputFormat::Text => match outcome {
                EdgeOutcome::Forward(request) => format!(
                    "{} {} {} forwarded to origin\n",
                    "✓".green(),
                    request.method,
                    request.uri
                ),
                EdgeOutcome::Respond(response) => {
                    let mut output = format!(
                        "{} {} {}\n",
                        "✗".red(),
                        response.status_code,
                        response.status_description
                    );
                    for (name, value) in &response.headers {
                        let _ = writeln!(output, "   {name}: {}", value.value);
                    }
                    output
                }
            },
        }
    }

    /// Formats a publish record.
    #[must_use]
    pub fn format_record(&self, record: &PublishRecord) -> String {
        match self.format {
            OutputFormat::Json => to_json(record),
            OutputFormat::Text => {
                let hasher = ConfigHasher::new();
                let mut output = String::new();

                let _ = write!(output, "\nPublication: {}\n\n", record.stack);
                let _ = writeln!(output, "   Id: {}", record.id);
                let _ = writeln!(output, "   Published: {}", record.published_at);
                let _ = writeln!(
                    output,
                    "   Fingerprint: {}",
                    hasher.short_hash(&record.fingerprint)
                );
                for (name, stack) in &record.stacks {
                    let _ = writeln!(
                        output,
                        "   {name}: {} ({})",
                        stack.template_file,
                        hasher.short_hash(&stack.template_hash)
                    );
                }

                if !record.history.is_empty() {
                    let _ = writeln!(output, "\n   Recent history ({}):", record.history.len());
                    for entry in record.history.iter().rev().take(5) {
                        let _ = writeln!(
                            output,
                            "     {} - {} ({})",
                            entry.published_at.format("%Y-%m-%d %H:%M"),
                            hasher.short_hash(&entry.fingerprint),
                            entry.stacks.join(", ")
                        );
                    }
                }

                output
            }
        }
    }

    /// Formats the comparison of an assembly with its last publication.
    #[must_use]
    pub fn format_changes(&self, changes: &[(String, StackChange)]) -> String {
        match self.format {
            OutputFormat::Json => to_json(&changes
                .iter()
                .map(|(stack, change)| ChangeJson { stack, change: *change })
                .collect::<Vec<_>>()),
            OutputFormat::Text => {
                let changed = changes
                    .iter()
                    .filter(|(_, c)| *c != StackChange::Unchanged)
                    .count();
                if changed == 0 {
                    return format!(
                        "{} No changes - the published assembly is up to date.\n",
                        "✓".green()
                    );
                }

                let rows: Vec<ChangeRow> = changes
                    .iter()
                    .map(|(stack, change)| ChangeRow {
                        stack: stack.clone(),
                        change: Self::format_change(*change),
                    })
                    .collect();

                let mut output = Table::new(rows).to_string();
                let _ = write!(output, "\n\n{changed} stack(s) changed.\n");
                output
            }
        }
    }

    /// Formats a rule effect with color.
    fn format_effect(effect: &str) -> String {
        match effect {
            "block" => effect.red().to_string(),
            "count" => effect.yellow().to_string(),
            "allow" => effect.green().to_string(),
            _ => effect.to_string(),
        }
    }

    /// Describes a rule statement in one line.
    fn format_statement(statement: &Statement) -> String {
        match statement {
            Statement::ManagedRuleGroupStatement(group) => {
                if group.excluded_rules.is_empty() {
                    format!("{}:{}", group.vendor_name, group.name)
                } else {
                    format!(
                        "{}:{} (excluding {})",
                        group.vendor_name,
                        group.name,
                        group.excluded_rules.len()
                    )
                }
            }
            Statement::RateBasedStatement(rate) => format!(
                "rate > {} per {}",
                rate.limit,
                serde_json::to_value(rate.aggregate_key_type)
                    .ok()
                    .and_then(|v| v.as_str().map(String::from))
                    .unwrap_or_default()
            ),
        }
    }

    /// Formats a stack change with color.
    fn format_change(change: StackChange) -> String {
        match change {
            StackChange::Added => "+added".green().to_string(),
            StackChange::Modified => "~modified".yellow().to_string(),
            StackChange::Removed => "-removed".red().to_string(),
            StackChange::Unchanged => "unchanged".dimmed().to_string(),
        }
    }

    /// Truncates a string to a maximum length.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.len() <= max_len {
            s.to_string()
        } else {
            format!("{}...", &s[..max_len - 3])
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

// JSON serialization helpers

#[derive(Serialize)]
struct ValidationJson<'a> {
    valid: bool,
    domain: &'a str,
    base_domain: &'a str,
    www: Option<&'a str>,
    cloudfront: bool,
    basic_auth_users: Vec<&'a str>,
    branch: &'a str,
    warnings: &'a [String],
}

#[derive(Serialize)]
struct AssemblyJson<'a> {
    manifest: &'a crate::synth::Manifest,
    files: Vec<String>,
    warnings: &'a [String],
}

#[derive(Serialize)]
struct ChangeJson<'a> {
    stack: &'a str,
    change: StackChange,
}
