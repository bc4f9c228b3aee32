use dioxus::prelude::*;

const HEART_PATH: &str = "M20.84 4.61a5.5 5.5 0 0 0-7.78 0L12 5.67l-1.06-1.06a5.5 5.5 0 0 0-7.78 7.78l1.06 1.06L12 21.23l7.78-7.78 1.06-1.06a5.5 5.5 0 0 0 0-7.78z";

/// Stroke icons, 24x24. Unknown names render a plain circle.
#[component]
pub fn Icon(name: String, class: String) -> Element {
    let fill = if name == "heart-filled" { "currentColor" } else { "none" };
    let shapes = match name.as_str() {
        "home" => rsx! {
            path { d: "M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z" }
            polyline { points: "9 22 9 12 15 12 15 22" }
        },
        "search" => rsx! {
            circle { cx: "11", cy: "11", r: "8" }
            path { d: "M21 21l-4.35-4.35" }
        },
        "playlist" => rsx! {
            path { d: "M3 6h13M3 12h13M3 18h9" }
            path { d: "M17 18V9l4-1" }
            circle { cx: "15", cy: "18", r: "2" }
        },
        "heart" | "heart-filled" => rsx! {
            path { d: HEART_PATH }
        },
        "music" => rsx! {
            path { d: "M9 18V5l12-2v13" }
            circle { cx: "6", cy: "18", r: "3" }
            circle { cx: "18", cy: "16", r: "3" }
        },
        "plus" => rsx! {
            path { d: "M12 5v14M5 12h14" }
        },
        "check" => rsx! {
            polyline { points: "20 6 9 17 4 12" }
        },
        "x" => rsx! {
            path { d: "M18 6L6 18M6 6l12 12" }
        },
        "user" => rsx! {
            path { d: "M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2" }
            circle { cx: "12", cy: "7", r: "4" }
        },
        "log-out" => rsx! {
            path { d: "M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4" }
            polyline { points: "16 17 21 12 16 7" }
            path { d: "M21 12H9" }
        },
        "loader" => rsx! {
            circle {
                cx: "12",
                cy: "12",
                r: "10",
                opacity: "0.25",
            }
            path { d: "M12 2a10 10 0 0 1 10 10", opacity: "0.75" }
        },
        _ => rsx! {
            circle { cx: "12", cy: "12", r: "10" }
        },
    };

    rsx! {
        svg {
            class: "{class}",
            view_box: "0 0 24 24",
            fill,
            stroke: "currentColor",
            stroke_width: "2",
            stroke_linecap: "round",
            stroke_linejoin: "round",
            {shapes}
        }
    }
}
