use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <section class="section not-found" style="min-height: 60vh; padding-top: 8rem; text-align: center;">
            <h1>{"404"}</h1>
            <p>{"Deze pagina bestaat niet."}</p>
            <Link<Route> to={Route::Home} classes="btn btn-outline">
                {"Terug naar home"}
            </Link<Route>>
        </section>
    }
}
