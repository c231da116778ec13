use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{error, info, warn};

use crate::collection::{write_json, Collection};
use crate::error::KepifyError;
use crate::parser::{self, Proposal};
use crate::source::{self, SourceBuilder};

/// What a single invocation should do
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root directory holding the proposals
    pub dir: PathBuf,
    /// Destination of the JSON index
    pub output: PathBuf,
    /// Base names to skip on top of the default ignore list
    pub extra_ignores: Vec<String>,
    /// Parse and report every document without writing output
    pub check_only: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    /// Written file, `None` in check mode
    pub output: Option<PathBuf>,
    /// Identifiers emitted more than once
    pub duplicates: Vec<String>,
}

/// Open and parse one document
///
/// The file handle is released before returning, whatever the outcome.
pub fn parse_file(path: &Path) -> Result<Proposal, KepifyError> {
    let file = File::open(path).map_err(|source| KepifyError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    parser::parse(BufReader::new(file)).map_err(|source| KepifyError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse documents in order, stopping at the first failure
pub fn parse_files(paths: &[PathBuf]) -> Result<Collection, KepifyError> {
    let mut collection = Collection::new();
    for path in paths {
        let proposal = parse_file(path)?;
        info!("parsed file successfully: {}", path.display());
        collection.add(proposal);
    }
    Ok(collection)
}

/// Parse every document, collecting failures instead of stopping
pub fn check_files(paths: &[PathBuf]) -> (Collection, Vec<KepifyError>) {
    let mut collection = Collection::new();
    let mut failures = Vec::new();

    for path in paths {
        match parse_file(path) {
            Ok(proposal) => collection.add(proposal),
            Err(e) => failures.push(e),
        }
    }

    (collection, failures)
}

/// Write the JSON index to `path`
///
/// Output goes to a temporary file next to the destination that is renamed
/// into place once complete, so a failed write leaves nothing behind.
pub fn write_output(path: &Path, collection: &Collection) -> Result<(), KepifyError> {
    let output_err = |source: std::io::Error| KepifyError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Same mode a plain create would give (0666 less the umask), not 0600
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir).map_err(output_err)?;
    write_json(collection, std::io::BufWriter::new(tmp.as_file_mut())).map_err(output_err)?;
    tmp.persist(path).map_err(|e| output_err(e.error))?;

    Ok(())
}

fn report_duplicates(collection: &Collection) -> Vec<String> {
    let duplicates = collection.duplicate_identifiers();
    for id in &duplicates {
        let titles: Vec<_> = collection
            .iter()
            .filter(|p| &p.identifier() == id)
            .map(|p| format!("{}:{}", p.owning_sig, p.title))
            .collect();
        warn!("identifier {} is shared by {} proposals ({})", id, titles.len(), titles.join(", "));
    }
    duplicates
}

/// Discover, parse and serialize the proposals described by `options`
pub fn run(options: &RunOptions) -> Result<RunSummary, KepifyError> {
    let config = options
        .extra_ignores
        .iter()
        .fold(SourceBuilder::new(&options.dir), |builder, name| {
            builder.ignore_name(name.clone())
        })
        .build();

    let files = source::discover(&config)?;
    if files.is_empty() {
        return Err(KepifyError::EmptyCollection(options.dir.clone()));
    }
    info!("found {} candidate documents in {}", files.len(), options.dir.display());

    if options.check_only {
        let (collection, failures) = check_files(&files);
        for failure in &failures {
            error!("{}", failure);
        }
        let duplicates = report_duplicates(&collection);
        if !failures.is_empty() {
            return Err(KepifyError::CheckFailed {
                count: failures.len(),
            });
        }
        info!("all {} proposals parsed", collection.len());
        return Ok(RunSummary {
            documents: collection.len(),
            output: None,
            duplicates,
        });
    }

    let collection = parse_files(&files)?;
    let duplicates = report_duplicates(&collection);

    info!("output file: {}", options.output.display());
    write_output(&options.output, &collection)?;
    info!("total proposals: {}", collection.len());

    Ok(RunSummary {
        documents: collection.len(),
        output: Some(options.output.clone()),
        duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseError;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn doc(sig: &str, title: &str, body: &str) -> String {
        format!("---\ntitle: {title}\nowning-sig: {sig}\nstatus: provisional\n---\n{body}")
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn options(root: &Path, out: &Path) -> RunOptions {
        RunOptions {
            dir: root.to_path_buf(),
            output: out.to_path_buf(),
            extra_ignores: Vec::new(),
            check_only: false,
        }
    }

    #[test]
    fn test_run_writes_members_in_traversal_order() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("keps.json");

        write(src.path(), "sig-b/0001-beta.md", &doc("sig-b", "Beta", "b"));
        write(src.path(), "sig-a/0002-alpha.md", &doc("sig-a", "Alpha", "a"));
        write(src.path(), "sig-a/README.md", "not a proposal");

        let summary = run(&options(src.path(), &out)).unwrap();
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.output.as_deref(), Some(out.as_path()));
        assert!(summary.duplicates.is_empty());

        let json = fs::read_to_string(&out).unwrap();
        let alpha = json.find(&crate::collection::identifier("sig-a", "Alpha")).unwrap();
        let beta = json.find(&crate::collection::identifier("sig-b", "Beta")).unwrap();
        assert!(alpha < beta);

        let decoded: HashMap<String, Proposal> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_parse_error_aborts_without_output() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("keps.json");

        write(src.path(), "0001-good.md", &doc("sig-x", "Good", ""));
        write(src.path(), "0002-bad.md", "---\ntitle: Bad\nowning-sig: sig-x\nstatus: draft\n");

        let err = run(&options(src.path(), &out)).unwrap_err();
        match &err {
            KepifyError::Parse { path, source } => {
                assert!(path.ends_with("0002-bad.md"));
                assert_eq!(
                    *source,
                    ParseError::UnterminatedMetadataBlock { opened_at: 1 }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("0002-bad.md"));
        assert!(!out.exists());
        // No stray temporary files either
        assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_only_ignored_files_is_empty_collection() {
        let src = TempDir::new().unwrap();
        write(src.path(), "README.md", "readme");
        write(src.path(), "kep-faq.md", "faq");
        write(src.path(), "notes.txt", "notes");

        let out = src.path().join("keps.json");
        let err = run(&options(src.path(), &out)).unwrap_err();
        assert!(matches!(err, KepifyError::EmptyCollection(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_extra_ignores_are_honored() {
        let src = TempDir::new().unwrap();
        write(src.path(), "0001-draft.md", "garbage without metadata");
        write(src.path(), "0002-real.md", &doc("sig-x", "Real", ""));

        let out = src.path().join("out.json");
        let mut opts = options(src.path(), &out);
        opts.extra_ignores.push("0001-draft.md".to_string());

        assert_eq!(run(&opts).unwrap().documents, 1);
    }

    #[test]
    fn test_missing_directory_is_source_unavailable() {
        let src = TempDir::new().unwrap();
        let err = run(&options(&src.path().join("keps"), &src.path().join("keps.json")))
            .unwrap_err();
        assert!(matches!(err, KepifyError::SourceUnavailable(_)));
    }

    #[test]
    fn test_duplicate_identifiers_are_written_twice() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("keps.json");

        write(src.path(), "0001-one.md", &doc("sig-x", "Same", "first"));
        write(src.path(), "0002-two.md", &doc("sig-x", "Same", "second"));

        let summary = run(&options(src.path(), &out)).unwrap();
        let id = crate::collection::identifier("sig-x", "Same");
        assert_eq!(summary.duplicates, vec![id.clone()]);

        let json = fs::read_to_string(&out).unwrap();
        assert_eq!(json.matches(&format!("\"{}\"", id)).count(), 2);
    }

    #[test]
    fn test_check_mode_reports_every_failure() {
        let src = TempDir::new().unwrap();
        write(src.path(), "0001-bad.md", "no metadata here");
        write(src.path(), "0002-good.md", &doc("sig-x", "Good", ""));
        write(src.path(), "0003-bad.md", "---\ntitle: Missing\n---\n");

        let files = source::discover(&SourceBuilder::new(src.path()).build()).unwrap();
        let (collection, failures) = check_files(&files);
        assert_eq!(collection.len(), 1);
        assert_eq!(failures.len(), 2);

        let out = src.path().join("keps.json");
        let mut opts = options(src.path(), &out);
        opts.check_only = true;
        let err = run(&opts).unwrap_err();
        assert!(matches!(err, KepifyError::CheckFailed { count: 2 }));
        assert!(!out.exists());
    }

    #[test]
    fn test_check_mode_success_writes_nothing() {
        let src = TempDir::new().unwrap();
        write(src.path(), "0001-good.md", &doc("sig-x", "Good", ""));

        let out = src.path().join("keps.json");
        let mut opts = options(src.path(), &out);
        opts.check_only = true;

        let summary = run(&opts).unwrap();
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.output, None);
        assert!(!out.exists());
    }

    #[test]
    fn test_parse_file_open_failure() {
        let dir = TempDir::new().unwrap();
        let err = parse_file(&dir.path().join("absent.md")).unwrap_err();
        assert!(matches!(err, KepifyError::Open { .. }));
    }

    #[test]
    fn test_write_output_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("no/such/dir/keps.json");
        let err = write_output(&target, &Collection::new()).unwrap_err();
        assert!(matches!(err, KepifyError::Output { .. }));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_mode_matches_plain_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("keps.json");
        write_output(&target, &Collection::new()).unwrap();

        let reference = dir.path().join("reference.json");
        File::create(&reference).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&target), mode(&reference));
    }
}
