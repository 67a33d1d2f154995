//! The compilation pipeline for a single file.

use std::io::Write;

use tracing::{debug, info, warn};
use tssc_engine::{EmittedFile, Engine, Program};
use tssc_util::Maybe;

use crate::deps;
use crate::error::DriverError;
use crate::reporter::Reporter;
use crate::request::CompilationRequest;

/// Compiles `request.input_file` with `engine`.
///
/// Returns `Ok(false)` when the check phase reported an error, in which case
/// nothing is emitted. Diagnostics produced while emitting are reported but
/// never change the result. Failures to read or write files are returned as
/// errors.
pub async fn compile_file<E, W>(
    engine: &E,
    request: &CompilationRequest,
    reporter: &mut Reporter<W>,
) -> Result<bool, DriverError>
where
    E: Engine,
    W: Write,
{
    let input = request.input_file.as_path();
    let options = request.configuration.with_out_dir(request.output_dir());
    let program = engine.create_program(input, &options)?;
    let source_file = program
        .source_file(input)
        .ok_or_else(|| DriverError::MissingSourceFile(input.to_path_buf()))
        .into_result()?;
    reporter.add_source(source_file);
    let imports = deps::import_files(source_file);
    debug!(input = %input.display(), imports = imports.len(), "created program");

    if request.check {
        let diagnostics = program.pre_emit_diagnostics(source_file);
        let has_error = reporter.report(&diagnostics).map_err(DriverError::Report)?;
        if has_error {
            info!(input = %input.display(), "check failed, nothing emitted");
            return Ok(false);
        }
        debug!(diagnostics = diagnostics.len(), "check passed");
    }

    if !request.emit {
        return Ok(true);
    }

    let output_dir = request.resolve(request.output_dir());
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|source| DriverError::CreateDir {
            path: output_dir.clone(),
            source,
        })?;

    if request.create_deps && !imports.is_empty() {
        let dependencies = deps::resolve_imports(&request.base_path, &request.output_file, &imports);
        deps::write_manifest(&request.base_path, &request.output_file, &dependencies).await?;
    }

    let mut emitted: Maybe<EmittedFile> = Maybe::None;
    let result = program.emit(source_file, &mut |file: EmittedFile| {
        if file.name.extension().is_some_and(|ext| ext == "js") {
            if let Maybe::Some(previous) = &emitted {
                debug!(replaced = %previous.name.display(), "engine emitted more than one module");
            }
            emitted = Maybe::Some(file);
        } else {
            debug!(name = %file.name.display(), "ignoring emitted file");
        }
    });

    match emitted.into_nullable() {
        Some(file) => write_output(request, &file).await?,
        None => warn!(
            input = %input.display(),
            skipped = result.emit_skipped,
            "engine emitted nothing"
        ),
    }

    reporter
        .report(&result.diagnostics)
        .map_err(DriverError::Report)?;
    Ok(true)
}

async fn write_output(request: &CompilationRequest, file: &EmittedFile) -> Result<(), DriverError> {
    let path = request.resolve(&request.output_file);
    if file.name != request.output_file {
        debug!(engine_name = %file.name.display(), "writing emitted file under the requested name");
    }
    tokio::fs::write(&path, &file.text)
        .await
        .map_err(|source| DriverError::WriteOutput {
            path: path.clone(),
            source,
        })?;
    info!(output = %path.display(), bytes = file.text.len(), "wrote output");
    Ok(())
}
