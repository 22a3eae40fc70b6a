//! Writing rendered template files into the tree.

use tracing::debug;

use crate::application::templates::TemplateFile;
use crate::application::tree::{Tree, join_path};
use crate::domain::RenderContext;
use crate::error::ForgeResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwriteStrategy {
    #[default]
    Overwrite,
    KeepExisting,
}

/// Render each template's path and content with `context` and write it
/// below `dest`. Returns the number of files written.
pub fn generate_files(
    tree: &mut Tree<'_>,
    files: &[TemplateFile],
    dest: &str,
    context: &RenderContext,
    strategy: OverwriteStrategy,
) -> ForgeResult<usize> {
    let mut written = 0;
    for file in files {
        let path = join_path(dest, &context.render(file.path));
        if strategy == OverwriteStrategy::KeepExisting && tree.exists(&path) {
            continue;
        }
        tree.write(&path, context.render(file.content));
        written += 1;
    }
    debug!(dest, written, "Generated files");
    Ok(written)
}
