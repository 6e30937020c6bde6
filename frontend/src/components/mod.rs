pub mod banner;
pub mod charts;
pub mod html_view;
pub mod icons;
pub mod layout;
pub mod stat_card;
pub mod upload;
