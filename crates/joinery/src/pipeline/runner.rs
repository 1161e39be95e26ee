use std::sync::Arc;

use tracing::{debug, error, info, info_span};

use crate::bundler::{self, BundleRequest, Bundler};
use crate::compress;
use crate::config::{load_project_config, resolve_config, BuildOptions};
use crate::error::{BuildError, ReadError};
use crate::manifest::Manifest;
use crate::minifier::{minify_artifacts, MinifierRegistry};
use crate::sanitize;

use super::context::BuildContext;
use super::export::{export, ExportedFile};
use super::progress::{NoopProgress, ProgressEvent, ProgressReporter};
use super::sequencer::{self, Step, COMPLETE};

pub struct Pipeline {
    context: BuildContext,
    bundler: Arc<dyn Bundler>,
    minifiers: MinifierRegistry,
    progress: Arc<dyn ProgressReporter>,
}

impl Pipeline {
    /// Resolves config against the package's `joinery.toml`.
    pub fn from_options(
        options: BuildOptions,
        bundler: Arc<dyn Bundler>,
    ) -> Result<Self, BuildError> {
        let project = load_project_config(options.source_root())?;
        let config = resolve_config(options.env, project.as_ref())?;

        Ok(Self::new(BuildContext::new(options, config), bundler))
    }

    /// Like [`Pipeline::from_options`], with an explicit project layer instead of the file.
    pub fn with_project_config(
        options: BuildOptions,
        bundler: Arc<dyn Bundler>,
        project: &serde_json::Value,
    ) -> Result<Self, BuildError> {
        let config = resolve_config(options.env, Some(project))?;

        Ok(Self::new(BuildContext::new(options, config), bundler))
    }

    pub fn new(context: BuildContext, bundler: Arc<dyn Bundler>) -> Self {
        Self {
            context,
            bundler,
            minifiers: MinifierRegistry::new(),
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_minifiers(mut self, minifiers: MinifierRegistry) -> Self {
        self.minifiers = minifiers;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut BuildContext {
        &mut self.context
    }

    pub fn into_context(self) -> BuildContext {
        self.context
    }

    /// `init → exists → read → assemble → pack → minify → files`.
    pub fn standard_steps() -> Vec<Step> {
        vec![
            Step::new("init", Self::init),
            Step::new("exists", Self::exists),
            Step::new("read", Self::read),
            Step::new("assemble", Self::assemble),
            Step::new("pack", Self::pack),
            Step::new("minify", Self::minify),
            Step::new("files", Self::files),
        ]
    }

    /// Run the full pipeline and return the finalized artifact set.
    pub fn run(&mut self) -> Result<Vec<ExportedFile>, BuildError> {
        let _build = info_span!("build",
            build_id = %self.context.id,
            name = %self.context.name,
            env = %self.context.env,
        )
        .entered();

        self.line(Self::standard_steps())?;

        Ok(self.context.exported.clone().unwrap_or_default())
    }

    /// Runs `steps` in order, reporting progress before each and stopping at the first error.
    pub fn line(&mut self, steps: Vec<Step>) -> Result<(), BuildError> {
        let total = steps.len();

        for (completed, Step { name, action }) in steps.into_iter().enumerate() {
            self.progress.report(ProgressEvent::Task {
                message: name.clone(),
                progress: sequencer::progress(completed, total),
            });

            let _step = info_span!("step", name = %name).entered();
            if let Err(e) = action(&mut *self) {
                return Err(self.scrap(e));
            }
        }

        self.progress.report(ProgressEvent::Task {
            message: COMPLETE.to_string(),
            progress: 100,
        });
        Ok(())
    }

    /// Reports `error` and hands it back to the caller.
    pub fn scrap(&self, error: BuildError) -> BuildError {
        error!(build_id = %self.context.id, error = %error, "Build aborted");
        self.progress.report(ProgressEvent::Error {
            error: error.to_string(),
        });
        error
    }

    /// Inserts or overwrites a raw artifact.
    pub fn stock(&mut self, filename: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.context.artifacts.stock(filename, content);
    }

    /// Whether `filename` is a minification candidate.
    pub fn filter(&self, filename: &str) -> bool {
        self.context.filter.accepts(filename)
    }

    pub fn init(&mut self) -> Result<(), BuildError> {
        let manifest = Manifest::load(self.context.source_root())?;

        let entry = self
            .context
            .entry_override
            .clone()
            .unwrap_or_else(|| manifest.entry().to_string());
        let joined = self.context.source_root().join(entry);
        let entry_path =
            std::path::absolute(&joined).map_err(|e| ReadError::ResolveEntry {
                path: joined.clone(),
                source: e,
            })?;

        info!(
            package = %manifest.name,
            entry = %sanitize::redact_path(&entry_path),
            "Loaded package manifest"
        );

        self.context.manifest = Some(manifest);
        self.context.entry_path = Some(entry_path);
        Ok(())
    }

    pub fn exists(&mut self) -> Result<(), BuildError> {
        let entry = self.entry_path("exists")?;

        let metadata = std::fs::metadata(&entry).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReadError::EntryNotFound(entry.clone()),
            _ => ReadError::ReadEntry {
                path: entry.clone(),
                source: e,
            },
        })?;

        if !metadata.is_file() {
            return Err(ReadError::EntryNotFile(entry).into());
        }

        debug!(bytes = metadata.len(), "Entry file exists");
        self.context.entry_size = Some(metadata.len());
        Ok(())
    }

    pub fn read(&mut self) -> Result<(), BuildError> {
        let entry = self.entry_path("read")?;

        let source = std::fs::read_to_string(&entry).map_err(|e| ReadError::ReadEntry {
            path: entry.clone(),
            source: e,
        })?;

        debug!(bytes = source.len(), "Read entry file");
        self.context.source_text = Some(source);
        Ok(())
    }

    pub fn assemble(&mut self) -> Result<(), BuildError> {
        let ctx = &mut self.context;
        let entry = ctx.entry_path.as_deref().ok_or(BuildError::StepOrder {
            step: "assemble",
            requires: "init",
        })?;
        let source = ctx.source_text.as_deref().ok_or(BuildError::StepOrder {
            step: "assemble",
            requires: "read",
        })?;

        let request = BundleRequest {
            entry,
            source,
            source_root: &ctx.source_root,
            dest_root: &ctx.dest_root,
            env: ctx.env,
            options: &ctx.config.bundler,
        };

        let count = bundler::assemble(self.bundler.as_ref(), &request, &mut ctx.artifacts)?;
        info!(count, "Bundler produced artifacts");
        Ok(())
    }

    pub fn pack(&mut self) -> Result<(), BuildError> {
        self.context.compressed = compress::pack(&self.context.artifacts)?;
        self.context.packed = true;

        debug!(count = self.context.compressed.len(), "Compressed artifacts");
        Ok(())
    }

    /// No-op unless the build is `prod` with minification enabled.
    pub fn minify(&mut self) -> Result<(), BuildError> {
        if !self.context.should_minify() {
            debug!(
                env = %self.context.env,
                minify = self.context.minify_enabled,
                "Skipping minification"
            );
            return Ok(());
        }

        let ctx = &mut self.context;
        let result = minify_artifacts(
            &mut ctx.artifacts,
            &ctx.filter,
            &ctx.config.minify,
            &self.minifiers,
        );

        // Files committed before a failure still need their compressed view.
        if ctx.packed {
            ctx.compressed = compress::pack(&ctx.artifacts)?;
        }

        let report = result?;
        info!(
            written = report.written.len(),
            in_place = report.in_place.len(),
            skipped = report.skipped.len(),
            "Minified artifacts"
        );
        Ok(())
    }

    /// Finalizes the artifact set and emits the `store` event.
    pub fn files(&mut self) -> Result<(), BuildError> {
        let files = export(&self.context.artifacts, &self.context.compressed);
        let names: Vec<String> = files.iter().map(|f| f.filename.clone()).collect();

        info!(count = names.len(), "Artifacts finalized");
        self.progress.report(ProgressEvent::Store { files: names });
        self.context.exported = Some(files);
        Ok(())
    }

    fn entry_path(&self, step: &'static str) -> Result<std::path::PathBuf, BuildError> {
        self.context
            .entry_path
            .clone()
            .ok_or(BuildError::StepOrder {
                step,
                requires: "init",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::EntryBundler;
    use crate::config::{Environment, ResolvedConfig};
    use crate::error::MinifyError;
    use crate::minifier::{ContentKind, MinifiedContent, Minifier, MinifyRequest};
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ProgressEvent>>);

    impl ProgressReporter for Recorder {
        fn report(&self, event: ProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl Recorder {
        fn events(&self) -> Vec<ProgressEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    struct Trim;

    impl Minifier for Trim {
        fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError> {
            Ok(MinifiedContent {
                content: String::from_utf8_lossy(request.content)
                    .replace(' ', "")
                    .into_bytes(),
                source_map: None,
            })
        }

        fn supports(&self, kind: ContentKind) -> bool {
            kind == ContentKind::Script
        }
    }

    fn setup_package(main: &str, files: &[(&str, &str)]) -> (TempDir, BuildOptions) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("webpack");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            root.join("package.json"),
            format!(r#"{{ "name": "test", "main": "{}" }}"#, main),
        )
        .unwrap();
        for (name, content) in files {
            let path = root.join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        let mut options = BuildOptions::new("webpack", tmp.path());
        options.dest_dir = tmp.path().join("dest");
        (tmp, options)
    }

    fn task(message: &str, progress: u8) -> ProgressEvent {
        ProgressEvent::Task {
            message: message.to_string(),
            progress,
        }
    }

    fn error_event(message: &str) -> ProgressEvent {
        ProgressEvent::Error {
            error: message.to_string(),
        }
    }

    fn pipeline(options: BuildOptions) -> Pipeline {
        Pipeline::from_options(options, Arc::new(EntryBundler::new())).unwrap()
    }

    #[test]
    fn test_init_defaults_entry_to_manifest_main() {
        let (_tmp, options) = setup_package("index.js", &[("index.js", "var a;")]);
        let mut pipeline = pipeline(options);

        pipeline.init().unwrap();

        let ctx = pipeline.context();
        assert_eq!(ctx.manifest.as_ref().unwrap().name, "test");
        let entry = ctx.entry_path.as_ref().unwrap();
        assert!(entry.is_absolute());
        assert!(entry.ends_with(Path::new("webpack").join("index.js")));
    }

    #[test]
    fn test_init_honours_entry_override() {
        let (_tmp, mut options) = setup_package("index.js", &[("sum.js", "var s;")]);
        options.entry = Some("sum.js".to_string());
        let mut pipeline = pipeline(options);

        pipeline.init().unwrap();

        assert!(pipeline
            .context()
            .entry_path
            .as_ref()
            .unwrap()
            .ends_with("sum.js"));
    }

    #[test]
    fn test_exists_and_read() {
        let (_tmp, options) = setup_package("index.js", &[("index.js", "var answer = 42;")]);
        let mut pipeline = pipeline(options);

        pipeline.init().unwrap();
        pipeline.exists().unwrap();
        pipeline.read().unwrap();

        assert_eq!(pipeline.context().entry_size, Some(16));
        assert_eq!(
            pipeline.context().source_text.as_deref(),
            Some("var answer = 42;")
        );
    }

    #[test]
    fn test_exists_fails_for_missing_entry() {
        let (_tmp, options) = setup_package("missing.js", &[]);
        let mut pipeline = pipeline(options);

        pipeline.init().unwrap();
        let err = pipeline.exists().unwrap_err();

        assert!(matches!(err, BuildError::Read(ReadError::EntryNotFound(_))));
    }

    #[test]
    fn test_exists_rejects_directory_entry() {
        let (_tmp, options) = setup_package("lib", &[("lib/index.js", "")]);
        let mut pipeline = pipeline(options);

        pipeline.init().unwrap();
        assert!(matches!(
            pipeline.exists(),
            Err(BuildError::Read(ReadError::EntryNotFile(_)))
        ));
    }

    #[test]
    fn test_steps_out_of_order() {
        let (_tmp, options) = setup_package("index.js", &[("index.js", "")]);
        let mut pipeline = pipeline(options);

        assert!(matches!(
            pipeline.read(),
            Err(BuildError::StepOrder {
                step: "read",
                requires: "init"
            })
        ));

        pipeline.init().unwrap();
        assert!(matches!(
            pipeline.assemble(),
            Err(BuildError::StepOrder {
                step: "assemble",
                requires: "read"
            })
        ));
    }

    #[test]
    fn test_filter_uses_context_filter() {
        let (_tmp, options) = setup_package("index.js", &[]);
        let pipeline = pipeline(options);

        assert!(!pipeline.filter("something.min.js"));
        assert!(pipeline.filter("something.js"));
    }

    #[test]
    fn test_minify_skipped_outside_prod() {
        let (_tmp, mut options) = setup_package("index.js", &[]);
        options.env = Environment::Staging;
        let mut pipeline =
            pipeline(options).with_minifiers(MinifierRegistry::empty().with("trim", Trim));
        pipeline.stock("index.js", "var a = 1;");

        pipeline.minify().unwrap();
        assert_eq!(pipeline.context().artifacts.len(), 1);

        pipeline.context_mut().env = Environment::Prod;
        pipeline.context_mut().minify_enabled = false;
        pipeline.minify().unwrap();
        assert_eq!(pipeline.context().artifacts.len(), 1);
    }

    #[test]
    fn test_minify_keeps_compressed_view_in_sync() {
        let (_tmp, mut options) = setup_package("index.js", &[]);
        options.env = Environment::Prod;
        let mut pipeline =
            pipeline(options).with_minifiers(MinifierRegistry::empty().with("trim", Trim));
        pipeline.stock("index.js", "var a = 1;");

        pipeline.pack().unwrap();
        pipeline.minify().unwrap();

        let ctx = pipeline.context();
        assert_eq!(
            ctx.artifacts.get("index.min.js").unwrap().content(),
            b"vara=1;"
        );
        assert_eq!(
            ctx.compressed.keys().cloned().collect::<Vec<_>>(),
            ctx.artifacts.filenames()
        );
    }

    #[test]
    fn test_line_reports_progress_and_completes() {
        let (_tmp, options) = setup_package("index.js", &[]);
        let recorder = Arc::new(Recorder::default());
        let mut pipeline = pipeline(options).with_progress(recorder.clone());

        pipeline
            .line(vec![
                Step::new("method1", |p: &mut Pipeline| {
                    p.stock("one.js", "1");
                    Ok(())
                }),
                Step::new("method2", |p: &mut Pipeline| {
                    assert!(p.context().artifacts.contains("one.js"));
                    Ok(())
                }),
            ])
            .unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                task("method1", 0),
                task("method2", 50),
                task(COMPLETE, 100),
            ]
        );
    }

    #[test]
    fn test_line_stops_at_first_error() {
        let (_tmp, options) = setup_package("index.js", &[]);
        let recorder = Arc::new(Recorder::default());
        let mut pipeline = pipeline(options).with_progress(recorder.clone());

        let err = pipeline
            .line(vec![
                Step::new("fail", |_: &mut Pipeline| {
                    Err(BuildError::Step("test".to_string()))
                }),
                Step::new("never", |_: &mut Pipeline| panic!("ran after failure")),
            ])
            .unwrap_err();

        assert_eq!(err.to_string(), "test");
        assert_eq!(
            recorder.events(),
            vec![task("fail", 0), error_event("test")]
        );
    }

    #[test]
    fn test_scrap_reports_and_returns_error() {
        let recorder = Arc::new(Recorder::default());
        let context =
            BuildContext::new(BuildOptions::new("pkg", "/src"), ResolvedConfig::default());
        let pipeline =
            Pipeline::new(context, Arc::new(EntryBundler::new())).with_progress(recorder.clone());

        let err = pipeline.scrap(BuildError::Step("test".to_string()));

        assert!(matches!(err, BuildError::Step(ref m) if m == "test"));
        assert_eq!(recorder.events(), vec![error_event("test")]);
    }

    #[test]
    fn test_run_end_to_end() {
        let (_tmp, mut options) = setup_package("index.js", &[("index.js", "var a = 1;")]);
        options.env = Environment::Prod;
        let recorder = Arc::new(Recorder::default());
        let mut pipeline = pipeline(options)
            .with_minifiers(MinifierRegistry::empty().with("trim", Trim))
            .with_progress(recorder.clone());

        let files = pipeline.run().unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["index.js", "index.min.js"]);
        assert!(files.iter().all(|f| f.compressed.is_some()));

        let events = recorder.events();
        assert!(events.contains(&ProgressEvent::Store {
            files: vec!["index.js".to_string(), "index.min.js".to_string()],
        }));
        assert_eq!(
            events.last(),
            Some(&task(COMPLETE, 100))
        );
    }
}
