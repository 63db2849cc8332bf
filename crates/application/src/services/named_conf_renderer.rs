use dnstree_domain::GlobalOption;
use std::fmt::Write;

use super::snapshot::ServerSetPlan;

pub const NAMED_CONF_HEADER: &str = "#This named.conf file is autogenerated. DO NOT EDIT";

/// Renders a server set's `named.conf`.
///
/// View clauses are written in plan order; the name server picks the first
/// view whose `match-clients` matches, so that order is the precedence.
#[derive(Debug, Clone)]
pub struct NamedConfRenderer {
    named_dir: String,
}

impl NamedConfRenderer {
    pub fn new(named_dir: impl Into<String>) -> Self {
        let named_dir: String = named_dir.into();
        Self {
            named_dir: named_dir.trim_end_matches('/').to_string(),
        }
    }

    pub fn render(&self, plan: &ServerSetPlan, global_options: &[GlobalOption]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", NAMED_CONF_HEADER);

        for block in global_options {
            push_block(&mut out, &block.options, "");
        }

        for acl in &plan.acls {
            let _ = writeln!(out, "acl {} {{", acl.name);
            for entry in &acl.entries {
                let _ = writeln!(out, "\t{};", entry.to_match_element());
            }
            out.push_str("};\n");
        }

        for view in plan.views.iter() {
            let _ = writeln!(out, "view \"{}\" {{", view.name);

            let clients = if view.acls.is_empty() {
                "any; ".to_string()
            } else {
                view.acls.iter().map(|acl| format!("{acl}; ")).collect()
            };
            let _ = writeln!(out, "\tmatch-clients {{ {}}};", clients);
            push_block(&mut out, &view.options, "\t");

            for zone in &view.zones {
                let _ = writeln!(out, "\tzone \"{}\" {{", zone.name);
                let _ = writeln!(out, "\t\ttype {};", zone.type_name);
                let _ = writeln!(
                    out,
                    "\t\tfile \"{}/{}\";",
                    self.named_dir,
                    zone.file_path(&view.name)
                );
                push_block(&mut out, &zone.options, "\t\t");
                out.push_str("\t};\n");
            }

            out.push_str("};\n");
        }

        out
    }
}

/// Appends freeform text line by line under `indent`. Blank text adds nothing.
fn push_block(out: &mut String, text: &str, indent: &str) {
    if text.trim().is_empty() {
        return;
    }
    for line in text.trim_end_matches('\n').lines() {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
}
