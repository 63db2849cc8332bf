/// Names of server sets, views and zones become directory and file names in
/// the exported tree, so they must be single safe path components.
pub fn validate_path_component(name: &str, entity: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{entity} name cannot be empty"));
    }
    if name.len() > 255 {
        return Err(format!("{entity} name cannot exceed 255 characters"));
    }
    if name == "." || name == ".." {
        return Err(format!("{entity} name cannot be '{name}'"));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '"' || c.is_whitespace() || c.is_control())
    {
        return Err(format!(
            "{entity} name '{name}' cannot contain slashes, quotes, or whitespace"
        ));
    }
    Ok(())
}
