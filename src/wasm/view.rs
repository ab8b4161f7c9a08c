//! Root view. Owns the whole UI state (router, contact form) and hands it to
//! the pages as props; the background follows the router from an effect.

use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement, Window};
use yew::prelude::*;

use super::host::DomHost;
use super::net::HttpSink;
use super::pages::{
    ContactPage, DashboardPage, HomePage, LoginPage, PricingPage, ServicesPage, NAV_PAGES,
};
use crate::background::BackgroundSelector;
use crate::config::SiteConfig;
use crate::contact::{deliver, ContactForm, Field};
use crate::error::SiteError;
use crate::page::PageId;
use crate::router::{Router, ScrollPort};

struct WindowScroll(Option<Window>);

impl ScrollPort for WindowScroll {
    fn scroll_to_origin(&self) {
        if let Some(window) = &self.0 {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }
}

/// The DOM host and the selector driving it, created once the layer exists.
struct Background {
    host: DomHost,
    selector: BackgroundSelector<DomHost>,
}

impl Background {
    fn attach(layer: &NodeRef, config: &SiteConfig) -> Result<Self, SiteError> {
        let layer = layer
            .cast::<HtmlElement>()
            .ok_or_else(|| SiteError::MissingElement("bg-layer".into()))?;
        let window = web_sys::window().ok_or(SiteError::NoWindow)?;
        let document = window.document().ok_or(SiteError::NoDocument)?;
        Ok(Self {
            host: DomHost::new(window, document, layer, config.clone()),
            selector: BackgroundSelector::new(config.clone()),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: SiteConfig,
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    menu_open: bool,
    on_navigate: Callback<PageId>,
    on_toggle_menu: Callback<()>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let links = || {
        NAV_PAGES
            .iter()
            .map(|&page| {
                html! {
                    <button class="nav-link" data-page={page.key()}
                        onclick={props.on_navigate.reform(move |_| page)}>
                        { page.title() }
                    </button>
                }
            })
            .collect::<Html>()
    };
    html! {
        <header class="header">
            <button class="logo" data-page={PageId::Home.key()}
                onclick={props.on_navigate.reform(|_| PageId::Home)}>
                { "Chatbot IA" }
            </button>
            <nav class="nav-desktop">{ links() }</nav>
            <button class="menu-toggle" aria-label="Menu" onclick={props.on_toggle_menu.reform(|_| ())}>
                { "\u{2630}" }
            </button>
            if props.menu_open {
                <nav id="mobile-menu" class="nav-mobile">{ links() }</nav>
            }
        </header>
    }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let router = use_state(Router::new);
    let form = use_state(ContactForm::new);
    let layer = use_node_ref();
    let background = use_mut_ref(|| None::<Background>);

    {
        let layer = layer.clone();
        let background = background.clone();
        let config = props.config.clone();
        use_effect_with_deps(
            move |backdrop: &Option<PageId>| {
                let mut slot = background.borrow_mut();
                if slot.is_none() {
                    match Background::attach(&layer, &config) {
                        Ok(attached) => *slot = Some(attached),
                        Err(err) => log::error!("background unavailable: {err}"),
                    }
                }
                if let Some(bg) = slot.as_mut() {
                    bg.selector.show_for(*backdrop, &mut bg.host);
                }
                || ()
            },
            router.backdrop_page(),
        );
    }
    {
        let background = background.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    if let Some(mut bg) = background.borrow_mut().take() {
                        bg.selector.clear(&mut bg.host);
                    }
                }
            },
            (),
        );
    }

    let on_navigate = {
        let router = router.clone();
        Callback::from(move |page: PageId| {
            let mut next = (*router).clone();
            next.navigate(page, &WindowScroll(web_sys::window()));
            router.set(next);
        })
    };
    let on_toggle_menu = {
        let router = router.clone();
        Callback::from(move |_: ()| {
            let mut next = (*router).clone();
            next.toggle_menu();
            router.set(next);
        })
    };
    let on_field = {
        let form = form.clone();
        Callback::from(move |(field, value): (Field, String)| {
            let mut next = (*form).clone();
            next.set(field, value);
            form.set(next);
        })
    };
    let on_submit = {
        let form = form.clone();
        let endpoint = props.config.contact_endpoint.clone();
        Callback::from(move |_: ()| {
            let mut next = (*form).clone();
            let Some(message) = next.begin_submit() else {
                return;
            };
            form.set(next.clone());
            let form = form.clone();
            let endpoint = endpoint.clone();
            spawn_local(async move {
                let outcome = deliver(&HttpSink, &endpoint, &message).await;
                next.finish(outcome);
                form.set(next);
            });
        })
    };
    let on_reset = {
        let form = form.clone();
        Callback::from(move |_: ()| {
            let mut next = (*form).clone();
            next.reset_status();
            form.set(next);
        })
    };

    let page = match router.current_page() {
        PageId::Home => html! { <HomePage on_navigate={on_navigate.clone()} /> },
        PageId::Services => html! { <ServicesPage on_navigate={on_navigate.clone()} /> },
        PageId::Pricing => html! { <PricingPage on_navigate={on_navigate.clone()} /> },
        PageId::Contact => html! {
            <ContactPage form={(*form).clone()} {on_field} {on_submit} {on_reset} />
        },
        PageId::Login => html! { <LoginPage on_navigate={on_navigate.clone()} /> },
        PageId::Dashboard => html! { <DashboardPage on_navigate={on_navigate.clone()} /> },
    };

    html! {
        <>
            <div id="bg-layer" class="bg-layer" ref={layer}></div>
            <div class="shell">
                <Header menu_open={router.menu_open()} {on_navigate} {on_toggle_menu} />
                <main id="page" class="page">{ page }</main>
                <footer class="footer">{ "\u{a9} Chatbot IA. Tous droits réservés." }</footer>
            </div>
        </>
    }
}

/// Render the site into `root`.
pub fn mount(root: Element, config: SiteConfig) -> yew::AppHandle<App> {
    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render()
}
