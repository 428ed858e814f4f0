use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vehicle_inspect_adapters::{
    analysis_to_json, inspection_to_json, present_inspection_row, present_issue_row,
    present_outcome, present_photo_row, present_total,
};
use vehicle_inspect_application::{
    AddPhotoCommand, AnalyzeInspectionCommand, AnnotateInspectionCommand,
    CreateInspectionCommand, ImportPhotosCommand, InspectionService, ListInspectionsCommand,
    ShowInspectionCommand,
};
use vehicle_inspect_domain::{detect_image_kind, ImageRef, InspectionId};

use crate::cli::Commands;

pub fn run(command: Commands, service: &InspectionService) -> Result<()> {
    match command {
        Commands::Create => {
            let id = service
                .create_inspection(CreateInspectionCommand)
                .context("create failed")?;
            println!("{id}");
        }
        Commands::AddPhoto {
            inspection,
            file,
            side,
            kind,
        } => {
            let id = inspection_id(&inspection)?;
            // Unknown inspections report NotFound before the upload is read.
            service
                .show_inspection(ShowInspectionCommand {
                    inspection_id: id.clone(),
                })
                .context("add-photo failed")?;
            let photo = service
                .add_photo(AddPhotoCommand {
                    inspection_id: id,
                    side,
                    kind,
                    image: Some(read_upload(&file)?),
                })
                .context("add-photo failed")?;
            println!("{}", present_photo_row(&photo));
        }
        Commands::Import { inspection, folder } => {
            let report = service
                .import_photos(ImportPhotosCommand {
                    inspection_id: inspection_id(&inspection)?,
                    folder: folder.to_string_lossy().into_owned(),
                })
                .context("import failed")?;
            println!(
                "import finished: scanned={}, imported={}",
                report.scanned_files,
                report.imported.len()
            );
        }
        Commands::Analyze { inspection, json } => {
            let report = service
                .analyze_inspection(AnalyzeInspectionCommand {
                    inspection_id: inspection_id(&inspection)?,
                })
                .context("analyze failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis_to_json(&report))?);
            } else {
                for issue in &report.results.issues {
                    println!("{}", present_issue_row(issue));
                }
                for outcome in &report.outcomes {
                    println!("{}", present_outcome(outcome));
                }
                println!("{}", present_total(report.results.summary.total_estimated_cost));
            }
        }
        Commands::Show { inspection, json } => {
            let inspection = service
                .show_inspection(ShowInspectionCommand {
                    inspection_id: inspection_id(&inspection)?,
                })
                .context("show failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&inspection_to_json(&inspection))?);
            } else {
                println!("inspection {} (created {})", inspection.id, inspection.created_at);
                for photo in &inspection.photos {
                    println!("{}", present_photo_row(photo));
                }
                match &inspection.results {
                    Some(results) => {
                        for issue in &results.issues {
                            println!("{}", present_issue_row(issue));
                        }
                        println!("{}", present_total(results.summary.total_estimated_cost));
                    }
                    None => println!("not analyzed yet"),
                }
            }
        }
        Commands::List => {
            let inspections = service
                .list_inspections(ListInspectionsCommand)
                .context("list failed")?;
            if inspections.is_empty() {
                println!("no inspections in catalog");
            }
            for summary in &inspections {
                println!("{}", present_inspection_row(summary));
            }
        }
        Commands::Annotate { inspection, out } => {
            let report = service
                .annotate_inspection(AnnotateInspectionCommand {
                    inspection_id: inspection_id(&inspection)?,
                })
                .context("annotate failed")?;
            fs::create_dir_all(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            for overlay in &report.overlays {
                let path = out.join(format!("{}.png", overlay.photo_id));
                fs::write(&path, &overlay.image.bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!(
                    "wrote {} ({} overlays)",
                    path.display(),
                    overlay.instructions.len()
                );
            }
            println!("{}", present_total(report.total_estimated_cost));
        }
    }

    Ok(())
}

fn inspection_id(value: &str) -> Result<InspectionId> {
    InspectionId::new(value).context("invalid inspection id")
}

fn read_upload(path: &Path) -> Result<ImageRef> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime_type = detect_image_kind(path)
        .mime_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(ImageRef::Inline {
        mime_type,
        bytes,
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    })
}
