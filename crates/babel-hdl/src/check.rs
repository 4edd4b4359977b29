//! Well-formedness checks on designs and rendered text.
//!
//! Two layers:
//! - [`check_design`] validates the tree: unique module names, one composing
//!   top, every sub-block instantiated exactly once, every instance bound to a
//!   declared module and to ports that module has.
//! - [`check_balanced`] scans rendered text and verifies that every opened
//!   structural block (`module`, `begin`, `case`) and every bracket is closed
//!   in order.

use std::collections::HashSet;

use crate::error::{EmissionError, Result};
use crate::tree::Design;

/// Structural statistics of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureSummary {
    /// Number of `module ... endmodule` blocks.
    pub modules: usize,
    /// Deepest keyword-block nesting seen, counting the module itself.
    pub max_depth: usize,
}

/// Validate the composition rules of a design tree.
pub fn check_design(design: &Design) -> Result<()> {
    let mut seen = HashSet::new();
    for module in &design.modules {
        if !seen.insert(module.name.as_str()) {
            return Err(EmissionError::DuplicateModule {
                name: module.name.clone(),
            });
        }
    }

    if design.top_module().is_none() {
        return Err(EmissionError::MissingTop {
            name: design.top.clone(),
        });
    }

    for module in &design.modules {
        for inst in module.instances() {
            let target = design
                .module(&inst.module)
                .ok_or_else(|| EmissionError::UnknownModule {
                    instance: inst.name.clone(),
                    module: inst.module.clone(),
                })?;
            for conn in &inst.connections {
                if target.port(&conn.port).is_none() {
                    return Err(EmissionError::UnknownPort {
                        instance: inst.name.clone(),
                        module: inst.module.clone(),
                        port: conn.port.clone(),
                    });
                }
            }
        }
    }

    let roots: Vec<String> = design
        .modules
        .iter()
        .filter(|m| design.instance_count(&m.name) == 0)
        .map(|m| m.name.clone())
        .collect();
    if roots.len() != 1 || roots[0] != design.top {
        return Err(EmissionError::TopLevelCount {
            found: roots.len(),
            names: roots,
        });
    }

    for module in design.modules.iter().filter(|m| m.name != design.top) {
        let count = design.instance_count(&module.name);
        if count != 1 {
            return Err(EmissionError::InstanceCount {
                module: module.name.clone(),
                count,
            });
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Module,
    Begin,
    Case,
}

impl Block {
    fn closer(self) -> &'static str {
        match self {
            Block::Module => "endmodule",
            Block::Begin => "end",
            Block::Case => "endcase",
        }
    }
}

/// Verify keyword blocks and brackets in rendered text are balanced.
pub fn check_balanced(text: &str) -> Result<StructureSummary> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut brackets: Vec<char> = Vec::new();
    let mut modules = 0;
    let mut max_depth = 0;

    let mut line = 1;
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    let unbalanced = |line: usize, detail: String| EmissionError::Unbalanced { line, detail };

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                loop {
                    match chars.get(i) {
                        None => return Err(unbalanced(line, "unterminated block comment".into())),
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 2;
                            break;
                        }
                        Some('\n') => {
                            line += 1;
                            i += 1;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            '(' | '[' | '{' => {
                brackets.push(c);
                i += 1;
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if brackets.pop() != Some(expected) {
                    return Err(unbalanced(line, format!("unmatched '{c}'")));
                }
                i += 1;
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "module" => {
                        if !blocks.is_empty() {
                            return Err(unbalanced(line, "module opened inside another block".into()));
                        }
                        blocks.push(Block::Module);
                    }
                    "begin" => blocks.push(Block::Begin),
                    "case" => blocks.push(Block::Case),
                    "end" | "endcase" | "endmodule" => {
                        let open = blocks.pop().ok_or_else(|| {
                            unbalanced(line, format!("'{word}' without an open block"))
                        })?;
                        if open.closer() != word {
                            return Err(unbalanced(
                                line,
                                format!("'{word}' closes a block expecting '{}'", open.closer()),
                            ));
                        }
                        if open == Block::Module {
                            if !brackets.is_empty() {
                                return Err(unbalanced(line, "unclosed bracket in module".into()));
                            }
                            modules += 1;
                        }
                    }
                    _ => {}
                }
                max_depth = max_depth.max(blocks.len());
            }
            _ => i += 1,
        }
    }

    if let Some(open) = blocks.last() {
        return Err(unbalanced(
            line,
            format!("{} block(s) left open, expected '{}'", blocks.len(), open.closer()),
        ));
    }
    if let Some(open) = brackets.last() {
        return Err(unbalanced(line, format!("unclosed '{open}'")));
    }

    Ok(StructureSummary { modules, max_depth })
}
