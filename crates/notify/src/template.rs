//! Reminder message templates.

use crate::model::{HostRecord, Notification};

const UNKNOWN: &str = "Unknown";

/// Reminder for one stale host of an owner holding several LDDs.
pub fn host_reminder(record: &HostRecord, recipient: &str, threshold_days: i64) -> Notification {
    let user_name = record.vdi_owner_name.as_deref().unwrap_or("User");
    let hostname = record.hostname.as_deref().unwrap_or(UNKNOWN);
    let last_login = record
        .citrix_last_connection_date
        .as_deref()
        .unwrap_or(UNKNOWN);
    let home_dir = record.home_directory.as_deref().unwrap_or(UNKNOWN);

    let subject = format!("[ACTION REQUIRED] LDD Cleanup for Host {hostname}");
    let body = format!(
        "Dear {user_name},\n\
         \n\
         Our records indicate that you currently have multiple LDDs assigned to you, \
         and the host \"{hostname}\" has not been accessed since {last_login}.\n\
         \n\
         As part of our monthly LDD cleanup policy:\n\
         - Only one LDD is permitted unless there's a documented business requirement.\n\
         - LDDs unused for more than {threshold_days} days are subject to removal.\n\
         \n\
         **Action Required:**\n\
         Please review the contents of the following home directory:\n\
         {home_dir}\n\
         \n\
         If this LDD is no longer needed, kindly raise a request to delete it via the \
         ServiceNow LDD Decommission process. If needed for a valid business reason, \
         please document the justification.\n\
         \n\
         Thank you for your cooperation.\n\
         \n\
         Regards,\n\
         CDE Ops Team\n"
    );

    Notification {
        recipient: recipient.to_string(),
        subject,
        body,
    }
}

/// Reminder listing every LDD assigned to a user from the tabular export.
pub fn assignment_reminder(user: &str, hostnames: &[String], threshold_days: i64) -> Notification {
    let hosts = hostnames.join(", ");
    let body = format!(
        "Dear {user},\n\
         \n\
         Our monthly audit shows you currently have multiple Linux Developer Desktops (LDDs) assigned:\n\
         \u{2192} Hostnames: {hosts}\n\
         \n\
         As part of general housekeeping, users are allowed only one LDD by default, \
         and LDDs unused for more than {threshold_days} days are subject to removal.\n\
         Please review your LDD usage and remove any that are not required.\n\
         \n\
         If there is a justified requirement, please inform the support team.\n\
         \n\
         Otherwise, kindly raise a request to delete the extra LDDs and clean up any \
         unnecessary files from your NFS home directory.\n\
         \n\
         Thank you for your cooperation.\n\
         \n\
         Regards,\n\
         InfraOps Team\n"
    );

    Notification {
        recipient: user.to_string(),
        subject: "LDD Cleanup Action Required".to_string(),
        body,
    }
}

/// Text block written to the output artifact for one notification.
pub fn artifact_block(notification: &Notification) -> String {
    format!(
        "--- EMAIL TO: {} ---\nSubject: {}\n\n{}",
        notification.recipient, notification.subject, notification.body
    )
}
