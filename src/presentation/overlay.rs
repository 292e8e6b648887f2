use crate::config::{Progress, RunProgress};
use leptos::*;

const PANEL_STYLE: &str =
    "position: absolute; bottom: 0; background-color: #333; width: 200px; padding: 10px 10px 0px 10px;";
const TRACK_STYLE: &str = "width: 100%; height: 20px; margin-bottom: 10px; overflow: hidden; \
     background-color: #f5f5f5; border-radius: 4px; box-shadow: inset 0 1px 2px rgba(0,0,0,.1);";
const FINISHED_STYLE: &str = "position:absolute;left:0;right:0;top:0;bottom:0;z-index:9999;\
     background-color:#999;font-size:100px;display:flex;align-items:center;\
     justify-content:center;font-family:sans-serif";

pub const TEST_BAR_COLOR: &str = "#5bc0de";
pub const GLOBAL_BAR_COLOR: &str = "#337ab7";

pub fn bar_style(percent: u32, color: &str) -> String {
    format!(
        "width: {percent}%; background-color: {color}; float: left; height: 100%; \
         font-family: Monospace; font-size: 12px; line-height: 20px; color: #fff; \
         text-align: center; box-shadow: inset 0 -1px 0 rgba(0,0,0,.15); transition: width .6s ease;"
    )
}

#[component]
fn ProgressBar(progress: Progress, color: &'static str) -> impl IntoView {
    view! {
        <div style=TRACK_STYLE>
            <div style={bar_style(progress.percent(), color)}>{progress.label()}</div>
        </div>
    }
}

/// Batch position: this test's run and the whole suite.
#[component]
pub fn ProgressPanel(progress: RunProgress) -> impl IntoView {
    view! {
        <div style=PANEL_STYLE>
            <ProgressBar progress={progress.test} color=TEST_BAR_COLOR/>
            <ProgressBar progress={progress.global} color=GLOBAL_BAR_COLOR/>
        </div>
    }
}

#[component]
pub fn FinishedOverlay() -> impl IntoView {
    view! { <div style=FINISHED_STYLE>"Test finished!"</div> }
}

/// Mount the progress panel once the page has loaded.
pub fn mount_progress_panel_on_load(progress: RunProgress) {
    let Some(window) = web_sys::window() else {
        return;
    };
    gloo::events::EventListener::once(&window, "load", move |_| {
        mount_to_body(move || view! { <ProgressPanel progress=progress/> });
    })
    .forget();
}

pub fn mount_finished_overlay() {
    mount_to_body(|| view! { <FinishedOverlay/> });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_tracks_percent() {
        let style = bar_style(42, TEST_BAR_COLOR);
        assert!(style.starts_with("width: 42%;"));
        assert!(style.contains("background-color: #5bc0de"));
    }
}
