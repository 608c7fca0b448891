//! Markdown report rendering.

use super::criticality::{assess, Assessment};
use super::sink::ReportSink;
use crate::manifest::ManifestRecord;
use std::io::{self, Write};

/// Run-specific values templated into the report.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Target origin derived from the manifest URL
    pub base_origin: String,
    /// Wordlist path as shown in the fuzzing suggestion
    pub wordlist: String,
}

/// Write the report and the wordlist for `record`, returning the risk
/// assessment shown in the report.
pub fn render_report<R: Write, W: Write, E: Write>(
    record: &ManifestRecord,
    context: &RenderContext,
    sink: &mut ReportSink<R, W, E>,
) -> io::Result<Assessment> {
    write_metadata(record, sink)?;
    write_paths(record, sink)?;

    for path in record.discovered_paths() {
        sink.word(&path)?;
    }

    sink.write("\n### 🧬 Database Schemas:\n")?;
    for schema in &record.schemas {
        sink.write(&format!("- ({}): {}\n", schema.kind, schema.path))?;
    }

    sink.write("\n### 🌐 Update Servers:\n")?;
    for server in &record.update_servers {
        sink.write(&format!("- {} → {}\n", server.name, server.url))?;
    }

    let assessment = assess(record);
    sink.write("\n### 🔥 Criticality Assessment:\n")?;
    for finding in &assessment.findings {
        sink.write(&format!("- {}\n", finding))?;
    }
    sink.write(&format!("\n{}\n", assessment.level.verdict()))?;

    write_suggestions(context, sink)?;

    Ok(assessment)
}

fn write_metadata<R: Write, W: Write, E: Write>(
    record: &ManifestRecord,
    sink: &mut ReportSink<R, W, E>,
) -> io::Result<()> {
    sink.write("## 🔍 Joomla Manifest Analysis Report\n\n")?;
    sink.write(&format!("**Name**: {}\n\n", record.name))?;
    sink.write(&format!("**Version**: {}\n", record.version))?;
    sink.write(&format!(
        "**Author**: {} <{}> ({})\n",
        record.author.name, record.author.email, record.author.url
    ))?;
    sink.write(&format!("**Created**: {}\n", record.creation_date))?;
    sink.write(&format!("**License**: {}\n\n", record.license))
}

fn write_paths<R: Write, W: Write, E: Write>(
    record: &ManifestRecord,
    sink: &mut ReportSink<R, W, E>,
) -> io::Result<()> {
    sink.write("### 📁 Exposed Folders:\n")?;
    for folder in &record.folders {
        sink.write(&format!("- /{}/\n", folder))?;
    }
    sink.write("\n")?;

    sink.write("### 📄 Exposed Files:\n")?;
    for file in &record.files {
        sink.write(&format!("- /{}\n", file))?;
    }
    sink.write("\n")?;

    sink.write("### 🔧 Install Script Detected:\n")?;
    if record.has_script_file() {
        sink.write(&format!("- {}\n", record.script_file))?;
    }
    Ok(())
}

fn write_suggestions<R: Write, W: Write, E: Write>(
    context: &RenderContext,
    sink: &mut ReportSink<R, W, E>,
) -> io::Result<()> {
    sink.write("\n### 🧪 Exploitation Suggestions:\n")?;
    sink.write("- Try LFI with /index.php?page=../../administrator/components/...\n")?;
    sink.write(&format!("- Use ffuf with the generated {}:\n", context.wordlist))?;
    sink.write(&format!(
        "```bash\nffuf -u {}/FUZZ -w {} -fc 403,404\n```\n",
        context.base_origin, context.wordlist
    ))?;
    sink.write("- Check upload permissions via /tmp, /cache, /logs\n")?;
    sink.write("- Test whether the install script runs internal commands via CSRF or ACL\n")
}
