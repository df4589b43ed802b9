//! Basic usage example for the regdigest library.
//!
//! Prints the image and manifest list digests of a reference.
//!
//! Run with: cargo run --example basic_usage -- docker.io/library/nginx:1.25

use libregdigest::{DigestError, ImageReference, ImageRepo};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let reference = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "docker.io/library/nginx:latest".to_string());
    let image: ImageReference = reference.parse()?;

    let repo = match ImageRepo::new(image) {
        Ok(repo) => repo,
        Err(DigestError::MissingCredentials { message }) => {
            eprintln!("✗ {}", message);
            eprintln!("  Set the backend's credentials in the environment and retry");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("✓ {} resolves through the {} backend\n", repo.image(), repo.kind());

    match repo.manifest_list_digest().await {
        Ok(digest) => println!("  manifest list: {}", digest),
        Err(e) => println!("  manifest list: {}", e),
    }

    match repo.image_digest().await {
        Ok(digest) => println!("  image:         {}", digest),
        Err(e) => println!("  image:         {}", e),
    }

    match repo.raw_manifest_list().await {
        Ok(list) => {
            println!("\n✓ {} platform manifests:", list.manifests().len());
            for manifest in list.manifests() {
                let platform = &manifest["platform"];
                println!(
                    "  - {}/{} {}",
                    platform["os"].as_str().unwrap_or("?"),
                    platform["architecture"].as_str().unwrap_or("?"),
                    manifest["digest"].as_str().unwrap_or("?")
                );
            }
        }
        Err(e) => println!("\n✗ {}", e),
    }

    Ok(())
}
