use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use lucide_leptos::{ChartLine, Cpu, Info, Layers, LoaderCircle, Play, TriangleAlert};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use edgesim_core::catalog::{self, Description, ParamSpec, Section};
use edgesim_core::charts;
use edgesim_core::controller::execute;
use edgesim_core::{Bound, ParamForm, ParamSet, RunController, RunState, Selection};

mod transport;

const INPUT_CLASS: &str = "w-full bg-slate-950 border border-slate-700 rounded-lg px-3 py-2 text-sm text-slate-100 placeholder-slate-600 focus:outline-none focus:border-blue-500";

#[component]
fn App() -> impl IntoView {
    view! {
        <Router>
            <div class="flex h-screen bg-slate-950 text-slate-100 font-sans">
                // Sidebar
                <nav class="w-64 border-r border-slate-800 flex flex-col p-4 bg-slate-900/50">
                    <div class="flex items-center space-x-3 px-2 py-6 mb-6">
                        <div class="p-2 bg-blue-600 rounded-lg shadow-lg shadow-blue-900/20">
                            <Cpu size=24 />
                        </div>
                        <span class="text-2xl font-bold tracking-tight text-white">"edgesim"</span>
                    </div>

                    <div class="space-y-1">
                        <A href="/" attr:class="flex items-center space-x-3 px-4 py-3 rounded-xl hover:bg-slate-800 transition-all duration-200 text-slate-400 hover:text-white group">
                            <div class="group-hover:text-blue-400 transition-colors">
                                <ChartLine size=20 />
                            </div>
                            <span class="font-medium">"Algorithm"</span>
                        </A>

                        <A href="/overview" attr:class="flex items-center space-x-3 px-4 py-3 rounded-xl hover:bg-slate-800 transition-all duration-200 text-slate-400 hover:text-white group">
                            <div class="group-hover:text-blue-400 transition-colors">
                                <Layers size=20 />
                            </div>
                            <span class="font-medium">"Overview"</span>
                        </A>
                    </div>
                </nav>

                // Main Content
                <main class="flex-grow overflow-auto p-8">
                    <Routes fallback=|| view! { <NotFound /> }.into_any()>
                        <Route path=path!("/") view=|| view! { <AlgorithmPage /> } />
                        <Route path=path!("/overview") view=|| view! { <OverviewPage /> } />
                    </Routes>
                </main>
            </div>
        </Router>
    }
    .into_any()
}

/// Both parameter forms mounted into a fresh parameter set.
fn mount_forms() -> (RwSignal<ParamForm>, RwSignal<ParamForm>, RwSignal<ParamSet>) {
    let env_form = ParamForm::for_section(Section::Environment);
    let algo_form = ParamForm::for_section(Section::Algorithm);
    let params = env_form
        .mount(&ParamSet::new())
        .and_then(|p| algo_form.mount(&p))
        .unwrap_or_else(|e| {
            log::error!("failed to mount parameter forms: {e}");
            ParamSet::new()
        });
    (RwSignal::new(env_form), RwSignal::new(algo_form), RwSignal::new(params))
}

#[component]
fn AlgorithmPage() -> impl IntoView {
    let first = catalog::ALGORITHM_NAMES[0].to_string();
    let controller = RwSignal::new(RunController::new(Selection::Single(first)));
    let (env_form, algo_form, params) = mount_forms();

    let on_select = move |ev: leptos::ev::Event| {
        let name = event_target_value(&ev);
        controller.update(|c| c.select(Selection::Single(name)));
    };

    view! {
        <div class="space-y-6 max-w-5xl">
            <h1 class="text-3xl font-bold text-white">"Run an algorithm"</h1>

            <div class="bg-slate-900 border border-slate-800 rounded-xl p-6 space-y-2">
                <label class="text-sm text-slate-400">"Algorithm"</label>
                <select class=INPUT_CLASS on:change=on_select>
                    {catalog::ALGORITHM_NAMES
                        .iter()
                        .map(|name| view! { <option value=*name>{*name}</option> })
                        .collect_view()}
                </select>
            </div>

            <ParamSection section=Section::Environment form=env_form params=params />
            <ParamSection section=Section::Algorithm form=algo_form params=params />
            <RunPanel controller=controller params=params />
        </div>
    }
}

#[component]
fn OverviewPage() -> impl IntoView {
    let controller = RwSignal::new(RunController::new(Selection::Comparison(Vec::new())));
    let (env_form, algo_form, params) = mount_forms();
    let selected = RwSignal::new(Vec::<String>::new());

    // Checked order is the order the charts list algorithms in.
    let toggle = move |name: &'static str, checked: bool| {
        selected.update(|names| {
            names.retain(|n| n != name);
            if checked {
                names.push(name.to_string());
            }
        });
        controller.update(|c| c.select(Selection::Comparison(selected.get_untracked())));
    };

    view! {
        <div class="space-y-6 max-w-5xl">
            <h1 class="text-3xl font-bold text-white">"Compare algorithms"</h1>

            <div class="bg-slate-900 border border-slate-800 rounded-xl p-6 space-y-3">
                <p class="text-sm text-slate-400">"Algorithms"</p>
                <div class="flex flex-wrap gap-4">
                    {catalog::ALGORITHM_NAMES
                        .iter()
                        .map(|name| {
                            let name: &'static str = *name;
                            view! {
                                <label class="flex items-center space-x-2 text-slate-300">
                                    <input
                                        type="checkbox"
                                        class="accent-blue-500"
                                        prop:checked=move || selected.with(|s| s.iter().any(|n| n == name))
                                        on:change=move |ev| toggle(name, event_target_checked(&ev))
                                    />
                                    <span class="font-mono">{name}</span>
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
            </div>

            <ParamSection section=Section::Environment form=env_form params=params />
            <ParamSection section=Section::Algorithm form=algo_form params=params />
            <RunPanel controller=controller params=params />
        </div>
    }
}

#[component]
fn ParamSection(
    section: Section,
    form: RwSignal<ParamForm>,
    params: RwSignal<ParamSet>,
) -> impl IntoView {
    view! {
        <div class="bg-slate-900 border border-slate-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4 text-white">{section.title()}</h2>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                {section
                    .params()
                    .iter()
                    .map(|spec| view! { <ParamField spec=spec form=form params=params /> })
                    .collect_view()}
            </div>
        </div>
    }
}

fn tooltip(description: &Description) -> String {
    match description {
        Description::Single(text) => text.to_string(),
        Description::Range { low, high } => format!("Low: {low}\nHigh: {high}"),
    }
}

#[component]
fn ParamField(
    spec: &'static ParamSpec,
    form: RwSignal<ParamForm>,
    params: RwSignal<ParamSet>,
) -> impl IntoView {
    let label = spec.label;

    let on_edit = move |bound: Bound, value: String| {
        let current = params.get_untracked();
        match form.try_update(|f| f.edit(label, bound, value, &current)) {
            Some(Ok(next)) => params.set(next),
            Some(Err(e)) => log::warn!("{e}"),
            None => {}
        }
    };

    let field = move |bound: Bound| {
        let placeholder = form
            .with_untracked(|f| f.control(label).map(|c| c.placeholder(bound)))
            .unwrap_or_default();
        view! {
            <input
                type="text"
                class=INPUT_CLASS
                placeholder=placeholder
                prop:value=move || {
                    form.with(|f| {
                        f.control(label)
                            .and_then(|c| c.text(bound))
                            .unwrap_or_default()
                            .to_string()
                    })
                }
                on:input=move |ev| on_edit(bound, event_target_value(&ev))
            />
        }
    };

    let inputs = if spec.is_range() {
        view! {
            <div class="grid grid-cols-2 gap-2">
                {field(Bound::Low)}
                {field(Bound::High)}
            </div>
        }
        .into_any()
    } else {
        field(Bound::Value).into_any()
    };

    view! {
        <div class="space-y-1">
            <div class="flex items-center space-x-2 text-sm text-slate-400">
                <span>{label}</span>
                <span class="text-slate-600 hover:text-blue-400 cursor-help" title=tooltip(&spec.description)>
                    <Info size=14 />
                </span>
            </div>
            {inputs}
        </div>
    }
}

#[component]
fn RunPanel(controller: RwSignal<RunController>, params: RwSignal<ParamSet>) -> impl IntoView {
    let disabled = move || controller.with(|c| c.is_busy() || c.selection().is_empty());

    let on_run = move |_| {
        let ticket = controller.try_update(|c| {
            c.set_params(params.get_untracked());
            c.begin()
        });
        let ticket = match ticket {
            Some(Ok(ticket)) => ticket,
            Some(Err(e)) => {
                log::warn!("run not started: {e}");
                return;
            }
            None => return,
        };
        spawn_local(async move {
            let client = transport::client();
            let result = execute(&client, &ticket).await;
            // The page may have been left while the request was out.
            controller.try_update(|c| c.complete(&ticket, result));
        });
    };

    view! {
        <div class="space-y-6">
            <button
                class="flex items-center space-x-2 px-5 py-2.5 rounded-xl bg-blue-600 hover:bg-blue-500 disabled:bg-slate-700 disabled:text-slate-400 text-white font-medium transition-colors"
                disabled=disabled
                on:click=on_run
            >
                {move || {
                    if controller.with(|c| c.is_busy()) {
                        view! {
                            <span class="animate-spin"><LoaderCircle size=18 /></span>
                            <span>"Running..."</span>
                        }
                            .into_any()
                    } else {
                        view! {
                            <Play size=18 />
                            <span>"Run"</span>
                        }
                            .into_any()
                    }
                }}
            </button>

            {move || controller.with(|c| match c.state() {
                RunState::Idle | RunState::Running { .. } => ().into_any(),
                RunState::Failed(e) => view! {
                    <div class="flex items-start space-x-3 bg-red-950/40 border border-red-900 rounded-xl p-4 text-red-300">
                        <TriangleAlert size=20 />
                        <div>
                            <p class="font-medium">{e.user_message()}</p>
                            <p class="text-sm text-red-400/80 font-mono">{e.to_string()}</p>
                        </div>
                    </div>
                }
                .into_any(),
                RunState::Succeeded { outcome, duration_secs } => {
                    let charts = charts::render(outcome);
                    view! {
                        <div class="space-y-4">
                            <div class="flex items-baseline justify-between">
                                <h2 class="text-2xl font-semibold text-white">{outcome.title()}</h2>
                                <span class="text-xs text-slate-500 font-mono">
                                    {format!("{:.1}s", duration_secs)}
                                </span>
                            </div>
                            {charts
                                .into_iter()
                                .map(|chart| view! { <PlotlyChart title=chart.title.clone() json=chart.to_json() /> })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }
            })}
        </div>
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = newPlot)]
    fn new_plot(root: &JsValue, data: &JsValue, layout: &JsValue, config: &JsValue);
}

#[component]
fn PlotlyChart(title: String, json: String) -> impl IntoView {
    let div_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move |_| {
        if let Some(div) = div_ref.get() {
            if let Ok(js_value) = js_sys::JSON::parse(&json) {
                let data =
                    js_sys::Reflect::get(&js_value, &"data".into()).unwrap_or(JsValue::UNDEFINED);
                let layout =
                    js_sys::Reflect::get(&js_value, &"layout".into()).unwrap_or(JsValue::UNDEFINED);
                let config =
                    js_sys::Reflect::get(&js_value, &"config".into()).unwrap_or(JsValue::UNDEFINED);

                let div_element: &web_sys::HtmlElement = &div;
                new_plot(&div_element.into(), &data, &layout, &config);
            } else {
                log::error!("Failed to parse Plotly JSON");
            }
        }
    });

    view! {
        <div class="bg-white rounded-xl p-2 overflow-x-auto">
            <div node_ref=div_ref aria-label=title></div>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center h-full space-y-4">
            <h1 class="text-4xl font-bold">"404"</h1>
            <p class="text-slate-400">"Page not found"</p>
            <A href="/" attr:class="text-blue-400 hover:underline">"Back to Algorithm"</A>
        </div>
    }
    .into_any()
}

fn main() {
    let debug_enabled = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item("debug_enabled").ok().flatten())
        .is_some_and(|v| v == "true");

    let level = if debug_enabled {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
