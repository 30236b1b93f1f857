use leptos::prelude::*;

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"VoidCoder"</h1>
                <p class="sidebar-subtitle">"UI screenshots to AI prompts"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/dashboard" class="nav-link">"Dashboard"</a>
                </li>
                <li class="nav-item">
                    <a href="/history" class="nav-link">"History"</a>
                </li>
            </ul>
            <div class="sidebar-footer">
                <div class="upgrade-card">
                    <h4>"Upgrade to VoidCoder Pro"</h4>
                    <p>"Unlock advanced features and unlimited history."</p>
                    <button class="btn btn-primary btn-small">"Upgrade Now"</button>
                </div>
            </div>
        </nav>
    }
}
