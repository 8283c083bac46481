//! CSV dataset generation.

use crate::Result;
use crate::harvest::Record;
use camino::Utf8Path;
use ohno::IntoAppError;

const LOG_TARGET: &str = "    report";

/// The dataset's fixed column schema. Downstream consumers key on these
/// names; the order here is the contract.
pub const COLUMNS: [&str; 19] = [
    "Username",
    "Profile URL",
    "Country",
    "Repositories Count",
    "Followers",
    "Following",
    "Top Languages",
    "Most Used Language",
    "Total Stars",
    "Total Forks",
    "Public Gists",
    "Account Created At",
    "Bio",
    "Public Email",
    "Hireable",
    "Forked Repositories",
    "Last Activity Date",
    "Unique Topics",
    "Total Repository Size (KB)",
];

/// Serialize the record collection to a flat CSV file, header row first.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_dataset(records: &[Record], path: &Utf8Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).into_app_err_with(|| format!("could not create dataset file '{path}'"))?;

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush()?;

    log::info!(target: LOG_TARGET, "wrote {} records to '{path}'", records.len());

    Ok(())
}

fn row(record: &Record) -> [String; 19] {
    [
        record.username.clone(),
        record.profile_url.clone(),
        record.country.clone(),
        record.repo_count.to_string(),
        record.followers.to_string(),
        record.following.to_string(),
        record.top_languages.clone(),
        record.most_used_language.clone(),
        record.total_stars.to_string(),
        record.total_forks.to_string(),
        record.public_gists.to_string(),
        record.created_at.clone(),
        record.bio.clone(),
        record.email.clone(),
        record.hireable.to_string(),
        record.forked_count.to_string(),
        record.last_activity.clone(),
        record.topics.clone(),
        record.total_size_kb.to_string(),
    ]
}
