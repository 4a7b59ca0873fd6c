use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use nrlstat_analysis::reporter::{Reporter, Severity};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Installs the stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from `info` to `debug`.
pub(crate) fn init_logging(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Forwards analysis diagnostics to `tracing`.
#[derive(Debug, Default)]
pub(crate) struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Destination of a JSON document: a file when a path is given, stdout otherwise.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => Output::create(path)?,
            None => Output::Stdout {
                writer: io::stdout().lock(),
            },
        };
        output.write_json(value)
    }

    fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to finish JSON output to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;
    Ok(value)
}

/// Creates `dir` and any missing parents.
pub(crate) fn ensure_directory(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// Writes `path` through a temporary sibling that is renamed into place once
/// `write` succeeds, so readers never observe a partial file.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut File) -> anyhow::Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    write(temp.as_file_mut())?;
    temp.as_file_mut()
        .sync_all()
        .with_context(|| format!("Failed to sync temporary file for {}", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("Failed to move output into place: {}", path.display()))?;
    Ok(())
}

/// A fully rendered output file, held in memory until every artifact of a run
/// is ready.
#[derive(Debug, Clone)]
pub(crate) struct Artifact {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: String, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name,
            contents: contents.into(),
        }
    }
}

/// Writes each artifact into `dir` and returns the paths written.
///
/// On failure the error names the artifacts of this run that were already in
/// place, since any other file in `dir` may be left over from an earlier run.
pub(crate) fn write_artifacts(
    dir: &Path,
    artifacts: &[Artifact],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        let result = write_atomically(&path, |file| {
            file.write_all(&artifact.contents)?;
            Ok(())
        })
        .with_context(|| format!("Failed to write {}", path.display()));
        if let Err(err) = result {
            if written.is_empty() {
                return Err(err);
            }
            let names = written
                .iter()
                .map(|p: &PathBuf| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(err.context(format!(
                "Output is incomplete; only these files are from this run: {names}"
            )));
        }
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = [
            Artifact::new("a.txt".to_owned(), "alpha"),
            Artifact::new("b.bin".to_owned(), vec![0_u8, 1, 2]),
        ];
        let paths = write_artifacts(dir.path(), &artifacts).unwrap();
        assert_eq!(paths, [dir.path().join("a.txt"), dir.path().join("b.bin")]);
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "alpha");
        assert_eq!(fs::read(&paths[1]).unwrap(), [0, 1, 2]);
    }

    #[test]
    fn test_write_artifacts_names_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the rename of the second artifact fail.
        fs::create_dir(dir.path().join("b.txt")).unwrap();
        fs::write(dir.path().join("b.txt/keep"), "").unwrap();
        let artifacts = [
            Artifact::new("a.txt".to_owned(), "alpha"),
            Artifact::new("b.txt".to_owned(), "beta"),
        ];

        let err = write_artifacts(dir.path(), &artifacts).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Output is incomplete"), "{message}");
        assert!(message.contains("a.txt"), "{message}");
        assert!(message.contains("Failed to write"), "{message}");
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, |file| {
            file.write_all(b"new")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_leaves_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        let result = write_atomically(&path, |file| {
            file.write_all(b"partial")?;
            anyhow::bail!("renderer failed")
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_json_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json_file::<serde_json::Value, _>("config", &path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config JSON file"));
    }

    #[test]
    fn test_save_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.json");
        Output::save_json(&[1, 2, 3], Some(path.clone())).unwrap();
        let value: Vec<i32> = read_json_file("value", &path).unwrap();
        assert_eq!(value, [1, 2, 3]);
    }
}
