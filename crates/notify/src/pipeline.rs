//! The two notification pipelines and the run that sequences them.
//!
//! Structured: load JSON -> group by resolved owner email -> keep owners with
//! more than one LDD -> keep stale hosts -> one reminder per host.
//! Tabular: load CSV (already limited to multi-LDD users) -> one reminder per
//! user listing every host.

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::aggregate::group_by_owner;
use crate::config::{NotifyConfig, StructuredDelivery, TabularDelivery};
use crate::delivery::{ArtifactChannel, DeliveryChannel, PrintChannel, SmtpChannel};
use crate::eligibility::is_stale;
use crate::error::NotifyError;
use crate::loader::{load_assignment_table_or_empty, load_structured_records_or_empty, TableColumns};
use crate::model::{AssignmentTable, PipelineReport, RunReport, StructuredRecords};
use crate::notifier::Notifier;
use crate::owner::resolve_owner_email;
use crate::template::{assignment_reminder, host_reminder};

/// Staleness and addressing rules for the structured pipeline.
#[derive(Debug, Clone)]
pub struct Policy {
    pub stale_days_threshold: i64,
    pub reference_date: NaiveDate,
    pub owner_domain: String,
}

impl Policy {
    pub fn from_config(config: &NotifyConfig, reference_date: NaiveDate) -> Self {
        Self {
            stale_days_threshold: config.stale_days_threshold,
            reference_date,
            owner_domain: config.owner_domain.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notify
// ---------------------------------------------------------------------------

/// Send a host reminder for every stale LDD of every owner holding more than
/// one. Returns the number of such owners.
pub fn notify_structured<C: DeliveryChannel>(
    records: &StructuredRecords,
    policy: &Policy,
    notifier: &mut Notifier<C>,
) -> usize {
    let groups = group_by_owner(records.records(), |r| {
        resolve_owner_email(r, &policy.owner_domain)
    });

    let mut multi_owners = 0;
    for group in groups.iter().filter(|g| g.has_multiple()) {
        multi_owners += 1;
        for record in &group.records {
            if !is_stale(record, policy.stale_days_threshold, policy.reference_date) {
                debug!(owner = %group.owner, hostname = ?record.hostname, "recently used, skipping");
                continue;
            }
            let notification = host_reminder(record, &group.owner, policy.stale_days_threshold);
            notifier.notify(&notification);
        }
    }
    multi_owners
}

/// Write one assignment reminder per user. Every user in the table already
/// holds more than one LDD, so no staleness filter applies.
pub fn notify_tabular<C: DeliveryChannel>(
    table: &AssignmentTable,
    stale_days_threshold: i64,
    notifier: &mut Notifier<C>,
) {
    for assignment in &table.assignments {
        info!(user = %assignment.user, hosts = assignment.hostnames.len(), "generating email");
        let notification =
            assignment_reminder(&assignment.user, &assignment.hostnames, stale_days_threshold);
        notifier.notify(&notification);
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// Load the structured source and notify through `channel`. Load failures
/// leave the pipeline with zero records; a channel failure at finish is
/// recorded in the report.
pub fn run_structured<C: DeliveryChannel>(
    config: &NotifyConfig,
    reference_date: NaiveDate,
    channel: C,
) -> PipelineReport {
    let mut report = PipelineReport::new("structured", channel.name());
    info!("processing JSON-based LDD data");

    let records = load_structured_records_or_empty(&config.structured_input);
    report.loaded = records.len();

    let policy = Policy::from_config(config, reference_date);
    let mut notifier = Notifier::new(channel);
    report.multi_owners = notify_structured(&records, &policy, &mut notifier);

    finish_into(&mut report, notifier);
    report
}

/// Load the tabular source and notify through `channel`.
pub fn run_tabular<C: DeliveryChannel>(config: &NotifyConfig, channel: C) -> PipelineReport {
    let mut report = PipelineReport::new("tabular", channel.name());
    info!("processing CSV-based LDD data");

    let columns = TableColumns {
        user: config.user_column.clone(),
        hostnames: config.hostname_column.clone(),
    };
    let table = load_assignment_table_or_empty(&config.tabular_input, &columns);
    report.loaded = table.len();
    report.multi_owners = table.len();

    let mut notifier = Notifier::new(channel);
    notify_tabular(&table, config.stale_days_threshold, &mut notifier);

    finish_into(&mut report, notifier);
    report
}

fn finish_into<C: DeliveryChannel>(report: &mut PipelineReport, notifier: Notifier<C>) {
    let stats = notifier.stats();
    report.eligible = stats.delivered + stats.failed;
    report.delivered = stats.delivered;
    report.failed = stats.failed;
    if let Err(e) = notifier.finish() {
        error!(pipeline = %report.pipeline, "failed to finish delivery: {e}");
        report.error = Some(e.to_string());
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub reference_date: NaiveDate,
}

/// Run the structured pipeline, then the tabular one. A failure in either is
/// logged and recorded; the other still runs.
pub fn run(config: &NotifyConfig, options: &RunOptions) -> RunReport {
    info!(reference_date = %options.reference_date, "starting LDD cleanup notifier");

    let structured = match structured_channel(config) {
        Ok(channel) => run_structured(config, options.reference_date, channel),
        Err(e) => failed_report("structured", &config.delivery.structured.to_string(), e),
    };

    let tabular = match tabular_channel(config) {
        Ok(channel) => run_tabular(config, channel),
        Err(e) => failed_report("tabular", &config.delivery.tabular.to_string(), e),
    };

    info!(
        structured_delivered = structured.delivered,
        structured_failed = structured.failed,
        tabular_delivered = tabular.delivered,
        tabular_failed = tabular.failed,
        "run complete"
    );

    RunReport {
        reference_date: options.reference_date.to_string(),
        stale_days_threshold: config.stale_days_threshold,
        structured,
        tabular,
    }
}

fn structured_channel(config: &NotifyConfig) -> Result<Box<dyn DeliveryChannel>, NotifyError> {
    let channel: Box<dyn DeliveryChannel> = match config.delivery.structured {
        StructuredDelivery::Mail => Box::new(SmtpChannel::new(
            &config.mail_relay_host,
            config.mail_relay_port,
            &config.sender_address,
        )?),
        StructuredDelivery::Print => Box::new(PrintChannel::stdout()),
    };
    Ok(channel)
}

fn tabular_channel(config: &NotifyConfig) -> Result<Box<dyn DeliveryChannel>, NotifyError> {
    let channel: Box<dyn DeliveryChannel> = match config.delivery.tabular {
        TabularDelivery::Artifact => Box::new(ArtifactChannel::create(&config.output_artifact)?),
        TabularDelivery::Print => Box::new(PrintChannel::stdout()),
    };
    Ok(channel)
}

fn failed_report(pipeline: &str, channel: &str, e: NotifyError) -> PipelineReport {
    error!(pipeline, "failed to process: {e}");
    PipelineReport {
        error: Some(e.to_string()),
        ..PipelineReport::new(pipeline, channel)
    }
}
