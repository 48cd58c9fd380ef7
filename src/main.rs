//! # Interview Report CLI
//!
//! Usage:
//!   interview-report interview.json -o summary.pdf
//!   echo '{ ... }' | interview-report --size letter
//!   interview-report interview.json --geometry page.json
//!   interview-report interview.json --layout > layout.json
//!   interview-report --example > interview.json

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use interview_report::error::ReportError;
use interview_report::export::{export_pdf, write_report};
use interview_report::model::{InterviewRecord, PageGeometry, PageSize};
use tracing_subscriber::EnvFilter;

/// Flags that take a value; their values are never the input file.
const VALUE_FLAGS: [&str; 3] = ["-o", "--geometry", "--size"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_interview_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), ReportError> {
    // Read input
    let input = match input_path(args) {
        Some(path) => fs::read_to_string(path).map_err(|e| ReportError::Io {
            path: PathBuf::from(path),
            source: e,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| ReportError::Io {
                    path: PathBuf::from("<stdin>"),
                    source: e,
                })?;
            buf
        }
    };

    let mut record: InterviewRecord = serde_json::from_str(&input)?;
    if record.date.is_none() {
        record.date = Some(chrono::Local::now().format("%Y-%m-%d").to_string());
    }
    let geometry = geometry_from_args(args)?;

    if args.iter().any(|a| a == "--layout") {
        let document = interview_report::render(&record, &geometry)?;
        let json = serde_json::to_string_pretty(&document)?;
        println!("{}", json);
        return Ok(());
    }

    let (output_path, bytes) = match flag_value(args, "-o") {
        Some(path) => {
            let path = Path::new(path).to_path_buf();
            let pdf_bytes = interview_report::render_pdf(&record, &geometry)?;
            write_report(&path, &pdf_bytes)?;
            (path, pdf_bytes.len())
        }
        None => {
            let path = export_pdf(&record, &geometry, Path::new("."))?;
            let written = fs::metadata(&path).map(|m| m.len() as usize).unwrap_or(0);
            (path, written)
        }
    };
    eprintln!(
        "✓ Written {} bytes to {}",
        bytes,
        output_path.display()
    );
    Ok(())
}

/// First positional argument, skipping the values of flags.
fn input_path(args: &[String]) -> Option<&str> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with('-') {
            return Some(arg);
        }
    }
    None
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// `--geometry` wins over `--size`; A4 when neither is given.
fn geometry_from_args(args: &[String]) -> Result<PageGeometry, ReportError> {
    if let Some(path) = flag_value(args, "--geometry") {
        let json = fs::read_to_string(path).map_err(|e| ReportError::Io {
            path: PathBuf::from(path),
            source: e,
        })?;
        return PageGeometry::from_json(&json);
    }

    match flag_value(args, "--size") {
        Some(name) => PageSize::from_name(name)
            .map(PageGeometry::for_size)
            .ok_or_else(|| {
                ReportError::InvalidGeometry(format!(
                    "unknown page size '{}' (expected a4, a5, letter or legal)",
                    name
                ))
            }),
        None => Ok(PageGeometry::a4()),
    }
}

fn example_interview_json() -> &'static str {
    r##"{
  "interviewerName": "Priya Raman",
  "candidateName": "Daniel Okafor",
  "role": "Senior Backend Engineer",
  "otherNotes": "Referred by the platform team. Focus on distributed systems.",
  "selectionStatus": "Selected",
  "finalFeedback": "Strong systems thinking and clear communication. Recommend moving to the onsite loop.",
  "candidateInfo": {
    "summary": "Backend engineer with a background in payments infrastructure and event-driven services.",
    "skills": ["Rust", "Go", "PostgreSQL", "Kafka", "Kubernetes"],
    "experience": [
      "Staff Engineer, Ledgerly (2021-present): led the migration to an event-sourced ledger",
      "Software Engineer, Parcelhub (2017-2021): built the routing and tracking APIs"
    ],
    "education": ["BSc Computer Science, University of Lagos"],
    "projects": ["Open-source rate limiter used by several fintech startups"],
    "strengths": ["Consistency models", "Incident response"],
    "areasToExplore": ["Frontend collaboration", "Mentoring experience"],
    "yearsOfExperience": 8
  },
  "questions": [
    {
      "question": "How would you guarantee exactly-once processing of payment events?",
      "notes": "Discussed idempotency keys and the outbox pattern. Mentioned the limits of Kafka transactions."
    },
    {
      "question": "What does this function return, and how would you make it safe for concurrent callers?",
      "code": "fn next_id(counter: &mut u64) -> u64 {\n    *counter += 1;\n    *counter\n}",
      "notes": "Went straight to AtomicU64::fetch_add and explained the ordering choice."
    },
    {
      "question": "Describe an outage you owned end to end."
    }
  ]
}
"##
}
