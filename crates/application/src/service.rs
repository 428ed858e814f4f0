use tracing::{debug, info, warn};
use vehicle_inspect_domain::{
    pair_photos, project_issues, AnnotationScope, AnnotationSettings, CostModel, Inspection,
    InspectionId, PairingEntry, PairingPolicy, Photo, PhotoKind, Results,
};

use crate::{
    AddPhotoCommand, AnalysisReport, AnalyzeInspectionCommand, AnnotatedPhoto,
    AnnotateInspectionCommand, AnnotationReport, ApplicationError, BootstrapStoreCommand, Clock,
    CreateInspectionCommand, DamageDetector, IdGenerator, ImageRaster, ImportPhotosCommand,
    ImportReport, InspectionRepository, InspectionSummary, ListInspectionsCommand, PhotoOutcome,
    PhotoScanner, ShowInspectionCommand, SkipReason,
};

/// Policy knobs for analysis and annotation.
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub cost_model: CostModel,
    pub pairing: PairingPolicy,
    pub annotation: AnnotationSettings,
}

pub struct InspectionService {
    store: Box<dyn InspectionRepository>,
    detector: Box<dyn DamageDetector>,
    raster: Box<dyn ImageRaster>,
    scanner: Box<dyn PhotoScanner>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    settings: ServiceSettings,
}

impl InspectionService {
    pub fn new(
        store: Box<dyn InspectionRepository>,
        detector: Box<dyn DamageDetector>,
        raster: Box<dyn ImageRaster>,
        scanner: Box<dyn PhotoScanner>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            detector,
            raster,
            scanner,
            clock,
            ids,
            settings,
        }
    }

    pub fn bootstrap_store(&self, _command: BootstrapStoreCommand) -> Result<(), ApplicationError> {
        self.store.initialize()
    }

    pub fn create_inspection(
        &self,
        _command: CreateInspectionCommand,
    ) -> Result<InspectionId, ApplicationError> {
        let inspection = Inspection::new(self.ids.inspection_id(), self.clock.now_timestamp_string());
        self.store.create_inspection(&inspection)?;
        info!(inspection = %inspection.id, "created inspection");
        Ok(inspection.id)
    }

    pub fn add_photo(&self, command: AddPhotoCommand) -> Result<Photo, ApplicationError> {
        self.load_inspection(&command.inspection_id)?;
        let image = command
            .image
            .ok_or_else(|| ApplicationError::InvalidInput("no file uploaded".to_string()))?;

        let photo = Photo {
            id: self.ids.photo_id(),
            side: command.side.unwrap_or_else(|| "unknown".to_string()),
            kind: command.kind.unwrap_or(PhotoKind::Pickup),
            image,
        };
        self.store.append_photo(&command.inspection_id, &photo)?;
        info!(
            inspection = %command.inspection_id,
            photo = %photo.id,
            side = %photo.side,
            kind = %photo.kind,
            "added photo"
        );
        Ok(photo)
    }

    pub fn import_photos(
        &self,
        command: ImportPhotosCommand,
    ) -> Result<ImportReport, ApplicationError> {
        if command.folder.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "folder path must not be empty".to_string(),
            ));
        }
        self.load_inspection(&command.inspection_id)?;

        let scan = self.scanner.scan_photos(&command.folder)?;
        let mut report = ImportReport {
            scanned_files: scan.scanned_files,
            imported: Vec::with_capacity(scan.photos.len()),
        };

        for scanned in scan.photos {
            let photo = Photo {
                id: self.ids.photo_id(),
                side: scanned.side,
                kind: scanned.kind,
                image: scanned.image,
            };
            self.store.append_photo(&command.inspection_id, &photo)?;
            debug!(
                photo = %photo.id,
                source = %scanned.source_path.display(),
                "imported photo"
            );
            report.imported.push(photo.id);
        }

        info!(
            inspection = %command.inspection_id,
            scanned = report.scanned_files,
            imported = report.imported.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Pairs return photos with pickups, prices every detection, and replaces
    /// the stored results. A detector failure only skips its own photo.
    pub fn analyze_inspection(
        &self,
        command: AnalyzeInspectionCommand,
    ) -> Result<AnalysisReport, ApplicationError> {
        let inspection = self.load_inspection(&command.inspection_id)?;
        let entries = pair_photos(&inspection.photos, self.settings.pairing)
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;

        info!(
            inspection = %inspection.id,
            return_photos = entries.len(),
            "starting damage analysis"
        );

        let mut issues = Vec::new();
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            let (return_photo, pickup) = match entry {
                PairingEntry::Paired {
                    return_photo,
                    pickup,
                } => (return_photo, pickup),
                PairingEntry::Unpaired { return_photo } => {
                    warn!(
                        photo = %return_photo.id,
                        side = %return_photo.side,
                        "no pickup photo for side, skipping"
                    );
                    outcomes.push(PhotoOutcome::Skipped {
                        photo_id: return_photo.id.clone(),
                        reason: SkipReason::NoMatchingPickup {
                            side: return_photo.side.clone(),
                        },
                    });
                    continue;
                }
            };

            debug!(
                photo = %return_photo.id,
                pickup = %pickup.id,
                side = %return_photo.side,
                "running detector"
            );

            let detections = match self.detector.detect(&return_photo.image) {
                Ok(detections) => detections,
                Err(error) => {
                    warn!(photo = %return_photo.id, %error, "detector failed, skipping photo");
                    outcomes.push(PhotoOutcome::Skipped {
                        photo_id: return_photo.id.clone(),
                        reason: SkipReason::DetectionFailed {
                            message: error.to_string(),
                        },
                    });
                    continue;
                }
            };

            let mut next_issue_id = || self.ids.issue_id();
            let priced = self.settings.cost_model.derive_issues(
                &return_photo.id,
                &detections,
                &mut next_issue_id,
            );

            outcomes.push(PhotoOutcome::Analyzed {
                photo_id: return_photo.id.clone(),
                issue_count: priced.len(),
            });
            for entry in priced {
                debug!(
                    issue = %entry.issue.id,
                    label = %entry.issue.label,
                    area = entry.breakdown.area,
                    base_cost = entry.breakdown.base_cost,
                    severity_multiplier = entry.breakdown.severity_multiplier,
                    size_multiplier = entry.breakdown.size_multiplier,
                    estimated_cost = entry.breakdown.estimated_cost,
                    "priced issue"
                );
                issues.push(entry.issue);
            }
        }

        let results = Results::from_issues(issues);
        self.store.set_results(&inspection.id, &results)?;

        info!(
            inspection = %inspection.id,
            issues = results.issues.len(),
            skipped = outcomes.iter().filter(|outcome| outcome.is_skipped()).count(),
            total_estimated_cost = results.summary.total_estimated_cost,
            "analysis finished"
        );

        Ok(AnalysisReport { results, outcomes })
    }

    pub fn annotate_inspection(
        &self,
        command: AnnotateInspectionCommand,
    ) -> Result<AnnotationReport, ApplicationError> {
        let inspection = self.load_inspection(&command.inspection_id)?;
        let return_photos: Vec<&Photo> = inspection.return_photos().collect();
        if return_photos.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "no return photos found".to_string(),
            ));
        }
        let results = inspection.results.as_ref().ok_or_else(|| {
            ApplicationError::InvalidInput("no analysis results found".to_string())
        })?;

        let settings = self.settings.annotation;
        let targets = match settings.scope {
            AnnotationScope::FirstReturnPhoto => &return_photos[..1],
            AnnotationScope::AllReturnPhotos => &return_photos[..],
        };

        let mut overlays = Vec::with_capacity(targets.len());
        for photo in targets {
            let mut canvas = self.raster.decode(&photo.image)?;
            let instructions = project_issues(
                results.issues_for_photo(&photo.id),
                canvas.dimensions,
                settings.shape,
                settings.stroke,
            );
            self.raster.draw(&mut canvas, &instructions)?;
            let image = self.raster.encode(&canvas)?;
            debug!(
                photo = %photo.id,
                width = canvas.dimensions.width,
                height = canvas.dimensions.height,
                shapes = instructions.len(),
                "rendered overlay"
            );
            overlays.push(AnnotatedPhoto {
                photo_id: photo.id.clone(),
                instructions,
                image,
            });
        }

        Ok(AnnotationReport {
            overlays,
            total_estimated_cost: results.summary.total_estimated_cost,
        })
    }

    pub fn show_inspection(
        &self,
        command: ShowInspectionCommand,
    ) -> Result<Inspection, ApplicationError> {
        self.load_inspection(&command.inspection_id)
    }

    pub fn list_inspections(
        &self,
        _command: ListInspectionsCommand,
    ) -> Result<Vec<InspectionSummary>, ApplicationError> {
        self.store.list_inspections()
    }

    fn load_inspection(&self, id: &InspectionId) -> Result<Inspection, ApplicationError> {
        self.store
            .find_inspection(id)?
            .ok_or_else(|| ApplicationError::NotFound(format!("inspection not found for id={id}")))
    }
}
