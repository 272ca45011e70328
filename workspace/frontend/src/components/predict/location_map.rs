use std::cell::RefCell;
use std::rc::Rc;

use common::{LatLng, DEFAULT_POSITION};
use compute::location::{lookup, LocationPicker};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::api_client::geocode::NominatimGeocoder;

const MAP_ID: &str = "location-map";

// Leaflet glue defined in index.html
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = housepriceMap, js_name = init)]
    fn map_init(div_id: &str, lat: f64, lng: f64, on_click: &js_sys::Function);

    #[wasm_bindgen(js_namespace = housepriceMap, js_name = setMarker)]
    fn map_set_marker(div_id: &str, lat: f64, lng: f64);

    #[wasm_bindgen(js_namespace = housepriceMap, js_name = remove)]
    fn map_remove(div_id: &str);
}

#[derive(Properties, PartialEq)]
pub struct LocationMapProps {
    /// Receives the resolved address of the latest clicked point
    pub on_address: Callback<String>,
}

#[function_component(LocationMap)]
pub fn location_map(props: &LocationMapProps) -> Html {
    let picker = use_mut_ref(LocationPicker::default);
    let position = use_state(|| DEFAULT_POSITION);
    let on_click_handle = use_mut_ref(|| None::<Closure<dyn FnMut(f64, f64)>>);

    {
        let picker = picker.clone();
        let position = position.setter();
        let on_address = props.on_address.clone();
        let on_click_handle = on_click_handle.clone();

        use_effect_with((), move |_| {
            let geocoder = Rc::new(NominatimGeocoder::default());
            let on_click = Closure::<dyn FnMut(f64, f64)>::new(move |lat: f64, lng: f64| {
                let point = LatLng::new(lat, lng);
                let ticket = picker.borrow_mut().select(point);
                map_set_marker(MAP_ID, lat, lng);
                position.set(point);

                let picker: Rc<RefCell<LocationPicker>> = picker.clone();
                let on_address = on_address.clone();
                let geocoder = geocoder.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let (ticket, outcome) = lookup(geocoder.as_ref(), ticket).await;
                    if let Some(address) = picker.borrow_mut().settle(ticket, outcome) {
                        log::debug!("Resolved address: {}", address);
                        on_address.emit(address.to_string());
                    }
                });
            });

            map_init(
                MAP_ID,
                DEFAULT_POSITION.lat,
                DEFAULT_POSITION.lng,
                on_click.as_ref().unchecked_ref(),
            );
            *on_click_handle.borrow_mut() = Some(on_click);

            move || {
                map_remove(MAP_ID);
                on_click_handle.borrow_mut().take();
            }
        });
    }

    html! {
        <div class="space-y-2">
            <div id={MAP_ID} class="rounded-lg border border-base-300" style="height: 320px;"></div>
            <p class="text-xs text-gray-500">
                <i class="fas fa-location-dot"></i>
                {format!(" {:.6}, {:.6}  Click the map to choose the location", position.lat, position.lng)}
            </p>
        </div>
    }
}
