pub(crate) mod health_check_controller;
pub(crate) mod landing_page_controller;
