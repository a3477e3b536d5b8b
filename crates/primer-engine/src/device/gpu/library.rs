use crate::device::backend::Library;
use crate::device::types::ShaderStage;

use super::WgpuBackend;

/// Entry point declared in a WGSL module.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct EntryPoint {
    pub name: String,
    pub stage: ShaderStage,
}

/// Compiled shader module plus the entry points it declares.
pub struct WgpuLibrary {
    module: wgpu::ShaderModule,
    entry_points: Vec<EntryPoint>,
}

impl WgpuLibrary {
    pub(crate) fn new(module: wgpu::ShaderModule, entry_points: Vec<EntryPoint>) -> Self {
        Self {
            module,
            entry_points,
        }
    }
}

/// A resolved entry point within a library.
#[derive(Debug, Clone)]
pub struct WgpuFunction {
    pub(crate) module: wgpu::ShaderModule,
    pub(crate) name: String,
}

impl Library<WgpuBackend> for WgpuLibrary {
    fn make_function(&self, name: &str, stage: ShaderStage) -> Option<WgpuFunction> {
        self.entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
            .map(|ep| WgpuFunction {
                module: self.module.clone(),
                name: ep.name.clone(),
            })
    }
}

/// Lists the `@vertex` and `@fragment` functions in `source`.
///
/// This is a token scan, not a parser: it trusts that `source` is valid WGSL
/// (the device validates it separately).
pub(crate) fn scan_entry_points(source: &str) -> Vec<EntryPoint> {
    let tokens = tokenize(source);
    let mut out = Vec::new();
    let mut pending: Option<ShaderStage> = None;

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "@" => {
                match tokens.get(i + 1).copied() {
                    Some("vertex") => pending = Some(ShaderStage::Vertex),
                    Some("fragment") => pending = Some(ShaderStage::Fragment),
                    // Compute entry points are not listed.
                    Some("compute") => pending = None,
                    _ => {}
                }
                i += 1;
            }
            "fn" => {
                if let (Some(stage), Some(name)) = (pending.take(), tokens.get(i + 1)) {
                    out.push(EntryPoint {
                        name: (*name).to_string(),
                        stage,
                    });
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    out
}

fn tokenize(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        // Block comments nest in WGSL.
        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            let mut depth = 0usize;
            while i < bytes.len() {
                if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    depth += 1;
                    i += 2;
                } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    depth -= 1;
                    i += 2;
                    if depth == 0 {
                        break;
                    }
                } else {
                    i += 1;
                }
            }
            continue;
        }

        if b.is_ascii_alphanumeric() || b == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(&source[start..i]);
            continue;
        }

        // Non-ASCII identifiers never name our entry points; step over whole chars.
        let len = source[i..].chars().next().map_or(1, char::len_utf8);
        tokens.push(&source[i..i + len]);
        i += len;
    }

    tokens
}
