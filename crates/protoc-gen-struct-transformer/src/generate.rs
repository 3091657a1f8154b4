//! Request-level generation pipeline

use crate::config::GeneratorConfig;
use crate::paths::{mod_file_name, module_stem, options_file_name, output_file_name, parent_dir, rebase};
use crate::render::{MessageBlock, render_file, render_mod_index, render_options_module};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use struct_transformer::options::file_options;
use struct_transformer::prelude::*;
use struct_transformer::{CodeGeneratorRequest, ErrorClass, FileDescriptorProto};

/// One file of the plugin response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the protoc output directory
    pub name: String,
    pub content: String,
}

/// Generate every output file for `request`.
///
/// Each requested file is generated together with its dependency closure,
/// re-rooted into the requested file's output directory. Files without a
/// models path are skipped. The first file generated under a given name wins.
pub fn generate(
    request: &CodeGeneratorRequest,
    config: &GeneratorConfig,
) -> TransformResult<Vec<GeneratedFile>> {
    let mut generator = Generator::new(&request.proto_file, config)?;
    let mut output = Output::default();

    for name in &request.file_to_generate {
        let Some(file) = request.proto_file.iter().find(|f| f.name() == name) else {
            tracing::warn!(file = %name, "requested file is not in the descriptor batch");
            continue;
        };

        let root_name = output_file_name(file, config);
        if !output.generate(&mut generator, file, root_name.clone())? {
            continue;
        }

        for dep in resolve_closure(file, &request.proto_file)? {
            let dep_name = rebase(&output_file_name(dep, config), &root_name);
            output.generate(&mut generator, dep, dep_name)?;
        }

        output.push(options_file_name(&root_name), render_options_module());
    }

    Ok(output.finish())
}

/// Per-batch state: the option index and the parsed native models
pub struct Generator<'a> {
    files: &'a [FileDescriptorProto],
    config: &'a GeneratorConfig,
    options: MessageOptionList,
    resolve: ResolveConfig,
    catalogs: HashMap<PathBuf, StructureCatalog>,
}

impl<'a> Generator<'a> {
    /// Index the message options of the whole batch
    pub fn new(files: &'a [FileDescriptorProto], config: &'a GeneratorConfig) -> TransformResult<Self> {
        let options = build_index(files)?;
        tracing::debug!(messages = options.len(), "indexed message options");

        Ok(Self {
            files,
            config,
            options,
            resolve: config.resolve_config(),
            catalogs: HashMap::new(),
        })
    }

    /// Render the transformer file for one schema file.
    ///
    /// Fails with [`TransformError::FileSkipped`] when the file names no models
    /// source. Messages without a target structure are noted in the output.
    pub fn process_file(&mut self, file: &FileDescriptorProto) -> TransformResult<String> {
        let models = file_options(file)?.rust_models_file_path.unwrap_or_default();
        if models.is_empty() {
            return Err(TransformError::FileSkipped {
                file: file.name().to_string(),
            });
        }

        let siblings = self.siblings(file)?;

        let catalog: &StructureCatalog = match self.catalogs.entry(self.config.models_root.join(&models)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let catalog = StructureCatalog::parse_file(entry.key())?;
                tracing::debug!(path = %entry.key().display(), structs = catalog.len(), "loaded native models");
                entry.insert(catalog)
            }
        };

        let ctx = FileContext {
            file,
            options: &self.options,
            catalog,
            config: &self.resolve,
        };

        let mut blocks = Vec::new();
        for (full_name, message) in file.messages() {
            match resolve_message(&ctx, message, &full_name) {
                Ok(mut resolved) => {
                    prefix_fields(&mut resolved.fields, &self.config.helper_package);
                    let native_summary = if self.config.debug {
                        catalog.lookup(&resolved.target).map(ToString::to_string)
                    } else {
                        None
                    };
                    blocks.push(MessageBlock::Transformers {
                        message: resolved,
                        native_summary,
                    });
                }
                Err(TransformError::NotEligible { message, oneofs }) => {
                    tracing::debug!(message = %message, "no rust_struct option, skipping message");
                    blocks.push(MessageBlock::Skipped {
                        full_name: message,
                        oneofs,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(render_file(file, &blocks, &siblings, self.config))
    }

    /// Modules of the direct dependencies that get transformers of their own
    fn siblings(&self, file: &FileDescriptorProto) -> TransformResult<Vec<String>> {
        let mut siblings = Vec::new();

        for dep in &file.dependency {
            if dep == file.name() {
                continue;
            }
            let Some(found) = self.files.iter().find(|f| f.name() == dep) else {
                continue;
            };
            if file_options(found)?.rust_models_file_path.is_some_and(|p| !p.is_empty()) {
                let name = output_file_name(found, self.config);
                siblings.push(module_stem(&name).to_string());
            }
        }

        Ok(siblings)
    }
}

/// Ordered, name-deduplicated response files
#[derive(Debug, Default)]
struct Output {
    files: Vec<GeneratedFile>,
}

impl Output {
    /// Generate `file` under `name` unless that name was already produced.
    ///
    /// Returns whether `file` has output at all.
    fn generate(
        &mut self,
        generator: &mut Generator<'_>,
        file: &FileDescriptorProto,
        name: String,
    ) -> TransformResult<bool> {
        if self.contains(&name) {
            tracing::debug!(file = file.name(), output = %name, "already generated");
            return Ok(true);
        }

        match generator.process_file(file) {
            Ok(content) => {
                tracing::info!(file = file.name(), output = %name, "generated transformers");
                self.push(name, content);
                Ok(true)
            }
            Err(e) if e.class() == ErrorClass::SkipFile => {
                tracing::debug!("{e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    fn push(&mut self, name: String, content: String) {
        if !self.contains(&name) {
            self.files.push(GeneratedFile { name, content });
        }
    }

    /// Append a module index to every output directory
    fn finish(mut self) -> Vec<GeneratedFile> {
        let mut dirs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for file in &self.files {
            dirs.entry(parent_dir(&file.name).to_string())
                .or_default()
                .insert(module_stem(&file.name).to_string());
        }

        for (dir, modules) in dirs {
            let modules: Vec<String> = modules.into_iter().collect();
            self.push(mod_file_name(&dir), render_mod_index(&modules));
        }

        self.files
    }
}
