//! tlsident: Command-line tool for checking TLS server identities.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tlsident_lib::{
    IdentityError, IdentityOptions, PeerCertificate, StdIpCanonicalizer, Verification,
};

#[derive(Parser)]
#[command(
    name = "tlsident",
    about = "Check whether a TLS peer certificate is valid for a hostname",
    long_about = "tlsident matches a hostname against the identities of a peer certificate\n\
                  (subjectAltName DNS and IP entries, falling back to the subject CN)\n\
                  using RFC 6125 rules with OpenSSL-compatible wildcard handling.\n\n\
                  Certificates are read as JSON documents in the shape of Node's\n\
                  `tls.TLSSocket#getPeerCertificate()`. All commands read from stdin\n\
                  when no file is given.",
    after_help = "EXAMPLES:\n\
                  \n  tlsident check www.example.com cert.json\
                  \n  tlsident check --json 203.0.113.5 cert.json\
                  \n  tlsident check --failures-only -r example.com certs/\
                  \n  echo 'DNS:\"a, b\", DNS:c' | tlsident altnames\
                  \n  cat cert.json | tlsident check example.com"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a certificate against a hostname (exit 0 = match, 1 = mismatch, 2 = malformed)
    #[command(after_help = "EXAMPLES:\n\
                      \n  tlsident check www.example.com cert.json\
                      \n  tlsident check --no-wildcards www.example.com cert.json\
                      \n  tlsident check --no-cn-fallback legacy.example.com cert.json\
                      \n  tlsident check example.com certs/ --recurse --failures-only")]
    Check {
        /// Hostname or IP address the client connected to
        hostname: String,
        /// Certificate JSON file or directory. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Reject wildcard names (`*.example.com`)
        #[arg(long)]
        no_wildcards: bool,
        /// Never fall back to the subject CN when there are no DNS altnames
        #[arg(long)]
        no_cn_fallback: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Only print failures (directory mode)
        #[arg(long)]
        failures_only: bool,
        /// Recurse into subdirectories (directory mode)
        #[arg(short, long)]
        recurse: bool,
    },
    /// Split a subjectAltName string into its entries, one per line
    #[command(after_help = "EXAMPLES:\n\
                      \n  echo 'DNS:a.com, IP Address:1.2.3.4' | tlsident altnames\
                      \n  tlsident altnames --json san.txt")]
    Altnames {
        /// File containing the subjectAltName string. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Maximum file size for certificate inputs (1 MiB).
const MAX_INPUT_BYTES: u64 = 1024 * 1024;

/// Exit status for a hostname mismatch.
const EXIT_MISMATCH: i32 = 1;
/// Exit status for a malformed subjectAltName string.
const EXIT_MALFORMED: i32 = 2;

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    let bytes = match file {
        Some(path) => {
            let meta = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat file: {}", path.display()))?;
            if meta.len() > MAX_INPUT_BYTES {
                anyhow::bail!(
                    "File too large ({} bytes, max {} bytes): {}",
                    meta.len(),
                    MAX_INPUT_BYTES,
                    path.display()
                );
            }
            std::fs::read(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .take(MAX_INPUT_BYTES)
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    String::from_utf8(bytes).context("Input is not valid UTF-8")
}

/// Check if a path looks like a certificate JSON document.
fn is_cert_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("json")
    )
}

/// Find all certificate JSON files in a directory.
fn find_cert_files(dir: &Path, recurse: bool) -> Vec<PathBuf> {
    let walker = if recurse {
        walkdir::WalkDir::new(dir)
    } else {
        walkdir::WalkDir::new(dir).max_depth(1)
    };
    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_cert_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// A single result from batch processing.
struct BatchResult {
    path: String,
    pass: bool,
    detail: String,
}

/// Process certificate files in parallel, printing `filename: result`.
///
/// Returns the number of failures.
fn run_batch<F>(files: &[PathBuf], failures_only: bool, op: F) -> usize
where
    F: Fn(&Path) -> BatchResult + Sync,
{
    let results: Vec<BatchResult> = files.par_iter().map(|f| op(f)).collect();

    let mut failures = 0;
    for r in &results {
        if !r.pass {
            failures += 1;
        }
        if failures_only && r.pass {
            continue;
        }
        if r.pass {
            println!("{}: {}", r.path, r.detail);
        } else {
            eprintln!("{}: {}", r.path, r.detail);
        }
    }
    failures
}

fn check_options(no_wildcards: bool, no_cn_fallback: bool) -> IdentityOptions {
    IdentityOptions {
        wildcards: !no_wildcards,
        cn_fallback: !no_cn_fallback,
    }
}

/// Run the identity check for one certificate document.
fn check_document<'a>(
    hostname: &str,
    cert: &'a PeerCertificate,
    options: &IdentityOptions,
) -> Result<Verification<'a>, IdentityError> {
    tlsident_lib::check_server_identity_with_options(hostname, cert, options, &StdIpCanonicalizer)
}

/// Print a single-file check result (JSON, text match, or text mismatch).
fn print_check_result(label: &str, outcome: &Verification<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", tlsident_lib::to_json(outcome)?);
    } else if outcome.is_valid() {
        println!("{}: {}", label, tlsident_lib::display_text(outcome));
    } else {
        eprintln!("{}: {}", label, tlsident_lib::display_text(outcome));
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Check {
            hostname,
            file,
            no_wildcards,
            no_cn_fallback,
            json,
            failures_only,
            recurse,
        } => {
            let options = check_options(*no_wildcards, *no_cn_fallback);

            // Directory mode: check all certificate documents in parallel
            if let Some(path) = file {
                if path.is_dir() {
                    let files = find_cert_files(path, *recurse);
                    if files.is_empty() {
                        anyhow::bail!("No certificate files (.json) found in {}", path.display());
                    }
                    let failures = run_batch(&files, *failures_only, |f| {
                        let label = f.display().to_string();
                        let cert = match std::fs::read_to_string(f)
                            .map_err(anyhow::Error::from)
                            .and_then(|s| {
                                PeerCertificate::from_json(&s).map_err(anyhow::Error::from)
                            })
                        {
                            Ok(c) => c,
                            Err(e) => {
                                return BatchResult {
                                    path: label,
                                    pass: false,
                                    detail: format!("FAIL (read error: {})", e),
                                }
                            }
                        };
                        match check_document(hostname, &cert, &options) {
                            Ok(outcome) => BatchResult {
                                path: label,
                                pass: outcome.is_valid(),
                                detail: tlsident_lib::display_text(&outcome),
                            },
                            Err(e) => BatchResult {
                                path: label,
                                pass: false,
                                detail: format!("FAIL ({}: {})", e.code(), e),
                            },
                        }
                    });
                    log::debug!("checked {} file(s), {} failure(s)", files.len(), failures);
                    if failures > 0 {
                        std::process::exit(EXIT_MISMATCH);
                    }
                    return Ok(());
                }
            }

            // Single file mode
            let input = read_input(file.as_ref())?;
            let cert = PeerCertificate::from_json(&input).context("Invalid certificate JSON")?;
            let label = file
                .as_ref()
                .map_or("stdin".to_string(), |f| f.display().to_string());

            match check_document(hostname, &cert, &options) {
                Ok(outcome) => {
                    print_check_result(&label, &outcome, *json)?;
                    if !outcome.is_valid() {
                        std::process::exit(EXIT_MISMATCH);
                    }
                }
                Err(e) => {
                    eprintln!("{}: FAIL ({}: {})", label, e.code(), e);
                    std::process::exit(EXIT_MALFORMED);
                }
            }
        }
        Commands::Altnames { file, json } => {
            let input = read_input(file.as_ref())?;
            let raw = input.trim_end_matches(['\r', '\n']);
            let entries = match tlsident_lib::split_alt_names(raw) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("{}: {}", e.code(), e);
                    std::process::exit(EXIT_MALFORMED);
                }
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!("{}", entry);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tlsident_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// `b.json`, `a.JSON`, `c.pem`, `notes.txt` and `nested/d.json`.
    fn cert_tree(name: &str) -> PathBuf {
        let dir = scratch_dir(name);
        for file in ["b.json", "a.JSON", "c.pem", "notes.txt"] {
            std::fs::write(dir.join(file), "{}").unwrap();
        }
        std::fs::create_dir(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested").join("d.json"), "{}").unwrap();
        dir
    }

    fn batch_result(pass: bool) -> BatchResult {
        BatchResult {
            path: "cert.json".to_string(),
            pass,
            detail: if pass { "OK" } else { "FAIL" }.to_string(),
        }
    }

    // ---- is_cert_file tests ----

    #[test]
    fn is_cert_file_json() {
        assert!(is_cert_file(Path::new("cert.json")));
    }

    #[test]
    fn is_cert_file_case_insensitive() {
        assert!(is_cert_file(Path::new("cert.JSON")));
        assert!(is_cert_file(Path::new("cert.Json")));
    }

    #[test]
    fn is_cert_file_rejects_non_json() {
        assert!(!is_cert_file(Path::new("cert.pem")));
        assert!(!is_cert_file(Path::new("cert.der")));
        assert!(!is_cert_file(Path::new("cert.json.bak")));
        assert!(!is_cert_file(Path::new("README.md")));
    }

    #[test]
    fn is_cert_file_rejects_no_extension() {
        assert!(!is_cert_file(Path::new("json")));
    }

    // ---- find_cert_files tests ----

    #[test]
    fn find_cert_files_non_recursive_skips_subdirs() {
        let dir = cert_tree("flat");
        let files = find_cert_files(&dir, false);
        assert_eq!(files, vec![dir.join("a.JSON"), dir.join("b.json")]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn find_cert_files_recurses() {
        let dir = cert_tree("recurse");
        let files = find_cert_files(&dir, true);
        assert_eq!(
            files,
            vec![
                dir.join("a.JSON"),
                dir.join("b.json"),
                dir.join("nested").join("d.json"),
            ]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn find_cert_files_sorted() {
        let dir = cert_tree("sorted");
        let files = find_cert_files(&dir, true);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted, "files should be sorted");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn find_cert_files_empty_dir() {
        let dir = scratch_dir("empty");
        assert!(find_cert_files(&dir, true).is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    // ---- option and batch tests ----

    #[test]
    fn check_options_inverts_flags() {
        assert_eq!(check_options(false, false), IdentityOptions::default());
        let strict = check_options(true, true);
        assert!(!strict.wildcards);
        assert!(!strict.cn_fallback);
        assert!(check_options(false, true).wildcards);
        assert!(check_options(true, false).cn_fallback);
    }

    #[test]
    fn run_batch_counts_failures() {
        let files = vec![
            PathBuf::from("good.json"),
            PathBuf::from("bad.json"),
            PathBuf::from("worse.json"),
        ];
        let failures = run_batch(&files, true, |f| batch_result(f.starts_with("good.json")));
        assert_eq!(failures, 2);
        assert_eq!(run_batch(&files, false, |_| batch_result(true)), 0);
        assert_eq!(run_batch(&[], false, |_| batch_result(false)), 0);
    }

    #[test]
    fn check_document_uses_options() {
        let cert = PeerCertificate::new().with_common_name("*.example.com");
        let loose = check_document("www.example.com", &cert, &check_options(false, false));
        assert!(loose.unwrap().is_valid());
        let strict = check_document("www.example.com", &cert, &check_options(true, false));
        assert!(!strict.unwrap().is_valid());
    }
}
