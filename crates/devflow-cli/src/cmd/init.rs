use std::path::Path;

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let name = match name {
        Some(n) => n.to_string(),
        None => root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "devflow".to_string()),
    };

    let created = devflow_core::workspace::init(root, &name)?;
    if created {
        println!("Initialized devflow workspace '{name}' in {}", root.display());
        println!("Next: devflow project create <slug> --name <name>");
    } else {
        println!("Workspace already initialized in {}", root.display());
    }
    Ok(())
}
