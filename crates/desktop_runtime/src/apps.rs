//! Declared desktop apps and the icon list built from them plus fetched profiles.

use platform_host::ProfileRecord;

use crate::model::{DesktopIconEntry, Size, WindowConfig, WindowContent};

/// Static descriptor for an app that always has a desktop icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub initial_size: Option<Size>,
}

const DECLARED_APPS: [AppDescriptor; 5] = [
    AppDescriptor {
        id: "about",
        title: "About Me",
        icon: "/icons/1F44B.svg",
        initial_size: None,
    },
    AppDescriptor {
        id: "projects",
        title: "Projects",
        icon: "/icons/1F680.svg",
        initial_size: None,
    },
    AppDescriptor {
        id: "terminal",
        title: "Terminal",
        icon: "/icons/1F4BB.svg",
        initial_size: Some(Size::new(700, 450)),
    },
    AppDescriptor {
        id: "blogs",
        title: "Blogs",
        icon: "/icons/1F4DD.svg",
        initial_size: None,
    },
    AppDescriptor {
        id: "clock",
        title: "Clock",
        icon: "/icons/1F570.svg",
        initial_size: None,
    },
];

pub const NEW_PROFILE_WINDOW_ID: &str = "new-profile";

pub fn declared_apps() -> &'static [AppDescriptor] {
    &DECLARED_APPS
}

fn declared_content(id: &str) -> WindowContent {
    match id {
        "projects" => WindowContent::Projects,
        "terminal" => WindowContent::Terminal,
        "blogs" => WindowContent::Blogs,
        "clock" => WindowContent::Clock,
        _ => WindowContent::About,
    }
}

impl AppDescriptor {
    pub fn icon_entry(&self) -> DesktopIconEntry {
        DesktopIconEntry {
            id: self.id.to_string(),
            title: self.title.to_string(),
            icon: self.icon.to_string(),
            content: declared_content(self.id),
            initial_size: self.initial_size,
        }
    }
}

/// Window id and icon id for a profile app.
pub fn profile_window_id(slug: &str) -> String {
    format!("profile-{slug}")
}

pub fn profile_icon_entry(profile: &ProfileRecord) -> DesktopIconEntry {
    DesktopIconEntry {
        id: profile_window_id(&profile.slug),
        title: profile.name.clone(),
        icon: profile.icon.clone(),
        content: WindowContent::Profile {
            profile_id: profile.id.clone(),
        },
        initial_size: None,
    }
}

/// Declared apps first, then every active profile in fetch order.
pub fn desktop_icons(profiles: &[ProfileRecord]) -> Vec<DesktopIconEntry> {
    declared_apps()
        .iter()
        .map(AppDescriptor::icon_entry)
        .chain(
            profiles
                .iter()
                .filter(|profile| profile.is_active)
                .map(profile_icon_entry),
        )
        .collect()
}

pub fn new_profile_window() -> WindowConfig {
    WindowConfig::new(
        NEW_PROFILE_WINDOW_ID,
        "New Profile",
        "/icons/2795.svg",
        WindowContent::NewProfile,
    )
}

pub fn blog_post_window(slug: &str, title: &str) -> WindowConfig {
    WindowConfig::new(
        format!("blog-{slug}"),
        title,
        "/icons/1F4DD.svg",
        WindowContent::BlogPost {
            slug: slug.to_string(),
        },
    )
}
