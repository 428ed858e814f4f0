use serde_json::{json, Value};
use vehicle_inspect_application::{AnalysisReport, InspectionSummary, PhotoOutcome, SkipReason};
use vehicle_inspect_domain::{ImageRef, Inspection, Issue, Photo};

pub fn present_inspection_row(summary: &InspectionSummary) -> String {
    let total = summary
        .total_estimated_cost
        .map_or_else(|| "-".to_string(), |total| total.to_string());
    format!(
        "{}\t{}\t{} photos\t{}",
        summary.id, summary.created_at, summary.photo_count, total
    )
}

pub fn present_photo_row(photo: &Photo) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        photo.id,
        photo.kind,
        photo.side,
        photo.image.describe()
    )
}

pub fn present_issue_row(issue: &Issue) -> String {
    format!(
        "{}\t{}\t{}\tconfidence={:.2}\tcost={}\tphoto={}",
        issue.id, issue.label, issue.severity, issue.confidence, issue.estimated_cost, issue.photo_id
    )
}

pub fn present_outcome(outcome: &PhotoOutcome) -> String {
    match outcome {
        PhotoOutcome::Analyzed {
            photo_id,
            issue_count,
        } => format!("photo {photo_id}: {issue_count} issue(s)"),
        PhotoOutcome::Skipped { photo_id, reason } => {
            format!("photo {photo_id}: skipped, {}", skip_reason_text(reason))
        }
    }
}

pub fn present_total(total_estimated_cost: u64) -> String {
    format!("total estimated cost: {total_estimated_cost}")
}

fn skip_reason_text(reason: &SkipReason) -> String {
    match reason {
        SkipReason::NoMatchingPickup { side } => format!("no pickup photo for side '{side}'"),
        SkipReason::DetectionFailed { message } => format!("detection failed: {message}"),
    }
}

/// Results in their wire shape, plus one entry per analyzed return photo.
pub fn analysis_to_json(report: &AnalysisReport) -> Value {
    let outcomes: Vec<Value> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            PhotoOutcome::Analyzed {
                photo_id,
                issue_count,
            } => json!({
                "photoId": photo_id,
                "status": "analyzed",
                "issueCount": issue_count,
            }),
            PhotoOutcome::Skipped { photo_id, reason } => json!({
                "photoId": photo_id,
                "status": "skipped",
                "reason": skip_reason_text(reason),
            }),
        })
        .collect();

    json!({
        "issues": report.results.issues,
        "summary": report.results.summary,
        "outcomes": outcomes,
    })
}

pub fn inspection_to_json(inspection: &Inspection) -> Value {
    let photos: Vec<Value> = inspection
        .photos
        .iter()
        .map(|photo| {
            let image = match &photo.image {
                ImageRef::Inline {
                    mime_type,
                    bytes,
                    file_name,
                } => json!({
                    "mimeType": mime_type,
                    "size": bytes.len(),
                    "fileName": file_name,
                }),
                ImageRef::Uri(uri) => json!({ "uri": uri }),
            };
            json!({
                "photoId": photo.id,
                "side": photo.side,
                "type": photo.kind,
                "image": image,
            })
        })
        .collect();

    json!({
        "id": inspection.id,
        "createdAt": inspection.created_at,
        "photos": photos,
        "results": inspection.results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehicle_inspect_domain::{
        BoundingBox, InspectionId, IssueId, PhotoId, PhotoKind, Results, Severity,
    };

    fn issue() -> Issue {
        Issue {
            id: IssueId::new("iss_1").expect("id"),
            label: "dent".to_string(),
            confidence: 0.9,
            severity: Severity::Major,
            bounding_box: Some(BoundingBox::new(0.0, 0.0, 0.04, 0.05)),
            photo_id: PhotoId::new("p_2").expect("id"),
            estimated_cost: 2400,
        }
    }

    #[test]
    fn issue_row_lists_cost_and_severity() {
        assert_eq!(
            present_issue_row(&issue()),
            "iss_1\tdent\tmajor\tconfidence=0.90\tcost=2400\tphoto=p_2"
        );
    }

    #[test]
    fn skipped_outcome_names_the_side() {
        let outcome = PhotoOutcome::Skipped {
            photo_id: PhotoId::new("p_3").expect("id"),
            reason: SkipReason::NoMatchingPickup {
                side: "rear".to_string(),
            },
        };
        assert_eq!(
            present_outcome(&outcome),
            "photo p_3: skipped, no pickup photo for side 'rear'"
        );
    }

    #[test]
    fn analysis_json_keeps_wire_field_names() {
        let report = AnalysisReport {
            results: Results::from_issues(vec![issue()]),
            outcomes: vec![PhotoOutcome::Analyzed {
                photo_id: PhotoId::new("p_2").expect("id"),
                issue_count: 1,
            }],
        };

        let value = analysis_to_json(&report);
        assert_eq!(value["summary"]["totalEstimatedCost"], 2400);
        assert_eq!(value["issues"][0]["estimatedCost"], 2400);
        assert_eq!(value["issues"][0]["photoId"], "p_2");
        assert_eq!(value["outcomes"][0]["status"], "analyzed");
    }

    #[test]
    fn inspection_json_describes_photos_without_bytes() {
        let mut inspection = Inspection::new(
            InspectionId::new("ins_1").expect("id"),
            "1700000000000".to_string(),
        );
        inspection.photos.push(Photo {
            id: PhotoId::new("p_1").expect("id"),
            side: "front".to_string(),
            kind: PhotoKind::Pickup,
            image: ImageRef::Inline {
                mime_type: "image/jpeg".to_string(),
                bytes: vec![1, 2, 3],
                file_name: None,
            },
        });

        let value = inspection_to_json(&inspection);
        assert_eq!(value["photos"][0]["type"], "pickup");
        assert_eq!(value["photos"][0]["image"]["size"], 3);
        assert!(value["results"].is_null());
    }
}
