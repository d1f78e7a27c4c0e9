//! Seller Listing Wizard
//!
//! Details -> Pricing -> Images -> Review, then submit as a [`NewListing`].
//! A step must validate before the wizard moves past it.

use crate::api::NewListing;
use crate::models::parse_price;
use crate::validation::FieldErrors;

pub const MAX_IMAGES: usize = 8;
pub const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Details,
    Pricing,
    Images,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Details,
        WizardStep::Pricing,
        WizardStep::Images,
        WizardStep::Review,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Details => "Details",
            WizardStep::Pricing => "Pricing & stock",
            WizardStep::Images => "Images",
            WizardStep::Review => "Review",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Form fields owned by this step (server field names)
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            WizardStep::Details => &["name", "description", "categoryId"],
            WizardStep::Pricing => &["price", "stock"],
            WizardStep::Images => &["images"],
            WizardStep::Review => &[],
        }
    }

    /// Step that owns a field, if any
    pub fn owning(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.fields().iter().any(|f| *f == field))
    }
}

/// Raw user input, kept as typed so back navigation loses nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    /// Subcategory the listing belongs to
    pub category_id: Option<u32>,
    pub price_input: String,
    pub stock_input: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingWizard {
    pub step: WizardStep,
    pub draft: ListingDraft,
    pub errors: FieldErrors,
}

impl Default for ListingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Details,
            draft: ListingDraft::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.step == WizardStep::Review
    }

    pub fn validate_step(&self, step: WizardStep) -> FieldErrors {
        let draft = &self.draft;
        let mut errors = FieldErrors::new();
        match step {
            WizardStep::Details => {
                let name = draft.name.trim();
                if name.is_empty() {
                    errors.add("name", "Name is required");
                } else if name.chars().count() > MAX_NAME_LEN {
                    errors.add("name", format!("Name must be at most {} characters", MAX_NAME_LEN));
                }
                if draft.description.trim().is_empty() {
                    errors.add("description", "Description is required");
                }
                if draft.category_id.is_none() {
                    errors.add("categoryId", "Choose a category");
                }
            }
            WizardStep::Pricing => {
                match parse_price(&draft.price_input) {
                    Some(cents) if cents > 0 => {}
                    Some(_) => errors.add("price", "Price must be greater than zero"),
                    None => errors.add("price", "Enter a price such as 19.99"),
                }
                if draft.stock_input.trim().parse::<u32>().is_err() {
                    errors.add("stock", "Stock must be a whole number");
                }
            }
            WizardStep::Images => {
                if draft.images.is_empty() {
                    errors.add("images", "Add at least one image");
                }
                if draft.images.len() > MAX_IMAGES {
                    errors.add("images", format!("At most {} images", MAX_IMAGES));
                }
            }
            WizardStep::Review => {}
        }
        errors
    }

    /// Validate the current step and advance when it passes
    pub fn next(&mut self) -> bool {
        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors = FieldErrors::new();
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        true
    }

    pub fn back(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
            self.errors = FieldErrors::new();
        }
    }

    /// Jump to a step; forward jumps need every earlier step to be valid
    pub fn go_to(&mut self, target: WizardStep) -> bool {
        if target > self.step {
            if let Some(invalid) = WizardStep::ALL[..target.index()]
                .iter()
                .copied()
                .find(|step| !self.validate_step(*step).is_empty())
            {
                self.errors = self.validate_step(invalid);
                self.step = invalid;
                return false;
            }
        }
        self.step = target;
        self.errors = FieldErrors::new();
        true
    }

    pub fn add_image(&mut self, url: &str) -> Result<(), String> {
        let url = url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err("Image must be an http(s) URL".to_string());
        }
        if self.draft.images.iter().any(|existing| existing == url) {
            return Err("Image already added".to_string());
        }
        if self.draft.images.len() >= MAX_IMAGES {
            return Err(format!("At most {} images", MAX_IMAGES));
        }
        self.draft.images.push(url.to_string());
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.draft.images.len() {
            self.draft.images.remove(index);
        }
    }

    /// Swap an image with its left neighbour; index 0 stays put
    pub fn move_image_up(&mut self, index: usize) {
        if index > 0 && index < self.draft.images.len() {
            self.draft.images.swap(index - 1, index);
        }
    }

    /// Build the request body, validating every step
    pub fn to_listing(&self) -> Result<NewListing, FieldErrors> {
        let mut errors = FieldErrors::new();
        for step in WizardStep::ALL {
            errors.merge(self.validate_step(step));
        }
        errors.into_result()?;

        let draft = &self.draft;
        Ok(NewListing {
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            category_id: draft.category_id.unwrap_or_default(),
            price: parse_price(&draft.price_input).unwrap_or_default(),
            stock: draft.stock_input.trim().parse().unwrap_or_default(),
            images: draft.images.clone(),
        })
    }

    /// Show errors from the server and return to the first step that owns
    /// one of the offending fields
    pub fn apply_server_errors(&mut self, errors: FieldErrors) {
        let target = errors
            .fields()
            .filter_map(WizardStep::owning)
            .min()
            .unwrap_or(WizardStep::Review);
        self.step = target;
        self.errors = errors;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
