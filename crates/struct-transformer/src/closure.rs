//! Transitive dependency closure of a schema file.

use crate::descriptor::FileDescriptorProto;
use crate::error::{TransformError, TransformResult};
use std::collections::HashSet;

/// Every file `root` transitively imports that is present in `all`.
///
/// The walk appends a dependency after its own dependencies, so deeper files
/// come first, and each file is listed at its first completed visit. Imports
/// missing from `all` are skipped. The root never appears in the result, even
/// if something imports it back.
///
/// A cycle that does not pass through the root is a [`TransformError::ImportCycle`].
pub fn resolve_closure<'a>(
    root: &FileDescriptorProto,
    all: &'a [FileDescriptorProto],
) -> TransformResult<Vec<&'a FileDescriptorProto>> {
    let mut walk = Walk {
        root: root.name(),
        all,
        stack: vec![root.name()],
        done: HashSet::new(),
        out: Vec::new(),
    };

    walk.collect(root)?;

    tracing::debug!(root = root.name(), files = walk.out.len(), "resolved dependency closure");
    Ok(walk.out)
}

struct Walk<'a, 'r> {
    root: &'r str,
    all: &'a [FileDescriptorProto],
    stack: Vec<&'r str>,
    /// Files whose subtree is finished and already in `out`
    done: HashSet<&'a str>,
    out: Vec<&'a FileDescriptorProto>,
}

impl<'a: 'r, 'r> Walk<'a, 'r> {
    fn collect(&mut self, file: &FileDescriptorProto) -> TransformResult<()> {
        let all = self.all;
        for dep in &file.dependency {
            if dep == self.root || self.done.contains(dep.as_str()) {
                continue;
            }

            let Some(found) = all.iter().find(|f| f.name() == dep) else {
                tracing::trace!(file = file.name(), dependency = %dep, "dependency not in batch, skipping");
                continue;
            };

            if self.stack.contains(&found.name()) {
                let mut chain: Vec<String> = self.stack.iter().map(|s| s.to_string()).collect();
                chain.push(found.name().to_string());
                return Err(TransformError::ImportCycle { chain });
            }

            self.stack.push(found.name());
            self.collect(found)?;
            self.stack.pop();

            self.done.insert(found.name());
            self.out.push(found);
        }

        Ok(())
    }
}
