//! `extract-archive` and `create-zip`.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use super::Context;
use crate::archive;
use crate::cli::{CreateZipArgs, ExtractArchiveArgs};
use crate::logging::StepStatus;
use crate::timestamp::new_timestamp_segment;

/// Extract `--archive` into `--dest`.
///
/// # Errors
///
/// Returns an error if extraction fails for any reason, including an entry
/// that would escape the destination.
pub fn extract(ctx: &Context, args: &ExtractArchiveArgs) -> Result<()> {
    ctx.log.stage(&format!("Extracting {}", args.archive.display()));
    let summary = archive::extract(&args.archive, &args.dest, args.password.as_deref())
        .with_context(|| format!("extracting {}", args.archive.display()))?;
    ctx.log.success(&format!(
        "extracted {} files and {} directories to {}",
        summary.files,
        summary.directories,
        args.dest.display()
    ));
    Ok(())
}

/// Archive `--source` into `--output`, then optionally extract the result
/// again to prove it opens.
///
/// # Errors
///
/// Returns an error if the archive cannot be written, or if `--verify` is
/// set and the new archive does not extract to the same number of files.
pub fn create_zip(ctx: &Context, args: &CreateZipArgs) -> Result<()> {
    ctx.log.stage(&format!("Archiving {}", args.source.display()));
    let created = archive::create(&args.source, &args.output, args.password.as_deref())
        .with_context(|| format!("creating {}", args.output.display()))?;
    let encrypted = if args.password.is_some() {
        " (AES-256)"
    } else {
        ""
    };
    ctx.log.success(&format!(
        "wrote {} files to {}{encrypted}",
        created.files,
        args.output.display()
    ));
    ctx.log.record_step("create archive", StepStatus::Ok, None);

    if !args.verify {
        return Ok(());
    }

    ctx.log.stage("Verifying archive");
    let check_dir = verify_dir(&args.output);
    let extracted = archive::extract(&args.output, &check_dir, args.password.as_deref())
        .with_context(|| format!("re-extracting {}", args.output.display()))?;
    if extracted.files != created.files {
        ctx.log.record_step("verify archive", StepStatus::Failed, None);
        bail!(
            "verification extracted {} files, expected {}",
            extracted.files,
            created.files
        );
    }
    ctx.log.success(&format!("verified into {}", check_dir.display()));
    ctx.log.record_step("verify archive", StepStatus::Ok, None);
    Ok(())
}

/// Timestamped folder beside `archive` for the verification extract.
fn verify_dir(archive: &Path) -> PathBuf {
    let parent = archive.parent().unwrap_or_else(|| Path::new(""));
    parent.join(new_timestamp_segment())
}
