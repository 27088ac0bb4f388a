//! Class index to disease label table for the 39-class leaf model.

use std::borrow::Cow;

/// Number of classes the model was trained on.
pub const CLASS_COUNT: usize = 39;

/// Canonical `<Crop>___<Condition>` labels, in model output order.
pub const LABELS: [&str; CLASS_COUNT] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Not a plant",
    "Blueberry___healthy",
    "Cherry___Powdery_mildew",
    "Cherry___healthy",
    "Corn___Cercospora_leaf_spot Gray_leaf_spot",
    "Corn___Common_rust",
    "Corn___Northern_Leaf_Blight",
    "Corn___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// Label for a class index; indices past the table become `Class_<idx>`.
pub fn label_for(index: usize) -> Cow<'static, str> {
    match LABELS.get(index) {
        Some(label) => Cow::Borrowed(*label),
        None => Cow::Owned(format!("Class_{}", index)),
    }
}

/// Human-readable form of a label: underscores become spaces.
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_table_covers_every_class() {
        // ---
        assert_eq!(LABELS.len(), CLASS_COUNT);
        assert_eq!(label_for(0), "Apple___Apple_scab");
        assert_eq!(label_for(4), "Not a plant");
        assert_eq!(label_for(38), "Tomato___healthy");
    }

    #[test]
    fn test_out_of_range_index() {
        // ---
        assert_eq!(label_for(39), "Class_39");
    }

    #[test]
    fn test_display_label() {
        // ---
        assert_eq!(display_label("Potato___Late_blight"), "Potato   Late blight");
        assert_eq!(display_label("Not a plant"), "Not a plant");
    }
}
