#[cfg(target_os = "windows")]
use std::env;
#[cfg(target_os = "windows")]
use std::path::PathBuf;

#[cfg(target_os = "windows")]
const WINDOWS_ICON_PATH: &str = "bundle/icon.ico";

fn main() {
    #[cfg(target_os = "windows")]
    {
        println!("cargo:rerun-if-changed={WINDOWS_ICON_PATH}");
        embed_windows_exe_icon().expect("Failed to embed Windows app icon");
    }

    slint_build::compile("ui/app-window.slint").expect("Slint build failed");
}

#[cfg(target_os = "windows")]
fn embed_windows_exe_icon() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let icon_path = manifest_dir.join(WINDOWS_ICON_PATH);
    if !icon_path.exists() {
        println!(
            "cargo:warning=Skipping Windows executable icon embedding because {WINDOWS_ICON_PATH} was not found."
        );
        return Ok(());
    }

    let mut resource = winresource::WindowsResource::new();
    resource.set_icon(icon_path.to_string_lossy().as_ref());
    resource.compile()?;

    Ok(())
}
